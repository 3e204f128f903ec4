// Request and response bodies of the HTTP API
use community_shared::types::Author;
use serde::{Deserialize, Serialize};

/// Body of `PATCH /targets/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
    pub increment: i64,
    #[serde(default)]
    pub voter_id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteResponse {
    pub like_count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuthorBody {
    #[serde(default)]
    pub name: String,
    pub avatar: Option<String>,
}

impl From<AuthorBody> for Author {
    fn from(body: AuthorBody) -> Self {
        Author {
            name: body.name,
            avatar: body.avatar,
        }
    }
}

/// Body of `POST /blogs` and `POST /forum`.
#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub category: String,
    pub body: Option<String>,
    #[serde(default)]
    pub author: AuthorBody,
}

/// Body of `POST /targets/{id}/comments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: AuthorBody,
    pub parent_id: Option<String>,
}
