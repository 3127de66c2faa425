use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const DEFAULT_BASE_URL: &str = "https://api.linkedin.com";
const RESTLI_VERSION_HEADER: &str = "X-Restli-Protocol-Version";
const RESTLI_VERSION: &str = "2.0.0";
const FEEDSHARE_RECIPE: &str = "urn:li:digitalmediaRecipe:feedshare-image";

/// LinkedIn UGC posting client
pub struct LinkedInClient {
    client: Client,
    access_token: String,
    base_url: String,
    visibility: String,
    media_title: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUploadBody {
    register_upload_request: RegisterUploadRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterUploadRequest {
    recipes: Vec<String>,
    owner: String,
    service_relationships: Vec<ServiceRelationship>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ServiceRelationship {
    relationship_type: String,
    identifier: String,
}

#[derive(Debug, Deserialize)]
struct RegisterUploadResponse {
    value: RegisterUploadValue,
}

#[derive(Debug, Deserialize)]
struct RegisterUploadValue {
    #[serde(rename = "uploadMechanism")]
    upload_mechanism: UploadMechanism,
    asset: String,
}

#[derive(Debug, Deserialize)]
struct UploadMechanism {
    #[serde(rename = "com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest")]
    http_request: MediaUploadHttpRequest,
}

#[derive(Debug, Deserialize)]
struct MediaUploadHttpRequest {
    #[serde(rename = "uploadUrl")]
    upload_url: String,
}

#[derive(Debug, Serialize)]
struct SharePayload {
    author: String,
    #[serde(rename = "lifecycleState")]
    lifecycle_state: String,
    #[serde(rename = "specificContent")]
    specific_content: SpecificContent,
    visibility: Visibility,
}

#[derive(Debug, Serialize)]
struct SpecificContent {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    share_content: ShareContent,
}

#[derive(Debug, Serialize)]
struct ShareContent {
    #[serde(rename = "shareCommentary")]
    share_commentary: TextBlock,
    #[serde(rename = "shareMediaCategory")]
    share_media_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<Vec<ShareMedia>>,
}

#[derive(Debug, Serialize)]
struct TextBlock {
    text: String,
}

#[derive(Debug, Serialize)]
struct ShareMedia {
    status: String,
    media: String,
    title: TextBlock,
}

#[derive(Debug, Serialize)]
struct Visibility {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    member_network: String,
}

#[derive(Debug, Deserialize)]
struct PostResponse {
    #[serde(default)]
    id: Option<String>,
}

impl LinkedInClient {
    /// Create a new client with the given access token
    pub fn new(access_token: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to build HTTP client")?,
            access_token,
            base_url: DEFAULT_BASE_URL.to_string(),
            visibility: "PUBLIC".to_string(),
            media_title: "Weekly Joke".to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_visibility(mut self, visibility: &str) -> Self {
        self.visibility = visibility.to_string();
        self
    }

    pub fn with_media_title(mut self, title: &str) -> Self {
        self.media_title = title.to_string();
        self
    }

    /// Resolve the authenticated member's profile id
    pub async fn profile_id(&self) -> Result<String> {
        debug!("Fetching LinkedIn profile");

        let response = self
            .client
            .get(format!("{}/v2/me", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .context("Failed to fetch LinkedIn profile")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to get LinkedIn profile ID ({}): {}", status, body);
        }

        let me: MeResponse = response
            .json()
            .await
            .context("Failed to parse LinkedIn profile response")?;

        Ok(me.id)
    }

    /// Publish a post, optionally with an attached image.
    ///
    /// A failure anywhere in the image upload handshake degrades to a
    /// text-only post; only the final share submission can fail the call.
    /// Returns the created post id.
    pub async fn publish(&self, text: &str, image: Option<&[u8]>) -> Result<String> {
        let profile_id = self.profile_id().await?;
        let author = format!("urn:li:person:{}", profile_id);

        let asset = match image {
            Some(bytes) => match self.upload_asset(&author, bytes).await {
                Ok(asset) => Some(asset),
                Err(e) => {
                    warn!(error = %e, "Image upload failed, posting text-only");
                    None
                }
            },
            None => None,
        };

        let payload = self.build_share(&author, text, asset);

        debug!(author = %author, "Submitting UGC post");

        let response = self
            .client
            .post(format!("{}/v2/ugcPosts", self.base_url))
            .bearer_auth(&self.access_token)
            .header(RESTLI_VERSION_HEADER, RESTLI_VERSION)
            .json(&payload)
            .send()
            .await
            .context("Failed to submit LinkedIn post")?;

        // The UGC API signals success with 201 specifically
        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LinkedIn post rejected ({}): {}", status, body);
        }

        let post: PostResponse = response
            .json()
            .await
            .context("Failed to parse LinkedIn post response")?;

        let post_id = post.id.unwrap_or_default();
        info!(post_id = %post_id, "Post published");

        Ok(post_id)
    }

    /// Two-step asset handshake: register the upload, then PUT the bytes.
    /// Returns the asset URN to reference from the share payload.
    async fn upload_asset(&self, author: &str, bytes: &[u8]) -> Result<String> {
        let body = RegisterUploadBody {
            register_upload_request: RegisterUploadRequest {
                recipes: vec![FEEDSHARE_RECIPE.to_string()],
                owner: author.to_string(),
                service_relationships: vec![ServiceRelationship {
                    relationship_type: "OWNER".to_string(),
                    identifier: "urn:li:userGeneratedContent".to_string(),
                }],
            },
        };

        let response = self
            .client
            .post(format!("{}/v2/assets", self.base_url))
            .query(&[("action", "registerUpload")])
            .bearer_auth(&self.access_token)
            .header(RESTLI_VERSION_HEADER, RESTLI_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to register image upload")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Image upload registration rejected ({}): {}", status, body);
        }

        let registered: RegisterUploadResponse = response
            .json()
            .await
            .context("Failed to parse upload registration response")?;

        let upload_url = registered.value.upload_mechanism.http_request.upload_url;

        debug!(asset = %registered.value.asset, "Uploading image bytes");

        let response = self
            .client
            .put(&upload_url)
            .header("Content-Type", "image/png")
            .body(bytes.to_vec())
            .send()
            .await
            .context("Failed to upload image")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Image upload rejected ({}): {}", status, body);
        }

        Ok(registered.value.asset)
    }

    fn build_share(&self, author: &str, text: &str, asset: Option<String>) -> SharePayload {
        let (category, media) = match asset {
            Some(asset) => (
                "IMAGE".to_string(),
                Some(vec![ShareMedia {
                    status: "READY".to_string(),
                    media: asset,
                    title: TextBlock {
                        text: self.media_title.clone(),
                    },
                }]),
            ),
            None => ("NONE".to_string(), None),
        };

        SharePayload {
            author: author.to_string(),
            lifecycle_state: "PUBLISHED".to_string(),
            specific_content: SpecificContent {
                share_content: ShareContent {
                    share_commentary: TextBlock {
                        text: text.to_string(),
                    },
                    share_media_category: category,
                    media,
                },
            },
            visibility: Visibility {
                member_network: self.visibility.clone(),
            },
        }
    }
}
