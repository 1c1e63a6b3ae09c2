use post_composition::{Category, Pin, Submission};
use serde::{Deserialize, Serialize};

/// Connection settings for the post backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token of the signed-in user
    pub access_token: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            access_token: None,
            timeout_secs: 60,
            connect_timeout_secs: 10,
        }
    }
}

/// Envelope every backend response is wrapped in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: String,
    pub response_message: String,
    pub data: Option<T>,
}

/// Pre-signed object-storage URL for one image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreSignedUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sub_categories: Vec<SubCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubCategory {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    pub categories: Vec<CategoryGroup>,
}

impl CategoryList {
    /// Only sub-categories are selectable; groups are flattened in server order
    pub fn selectable(self) -> Vec<Category> {
        self.categories
            .into_iter()
            .flat_map(|group| group.sub_categories)
            .map(|sub| Category {
                id: sub.id,
                name: sub.name,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub product_name: String,
    pub product_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PinPayload {
    pub position_x: f32,
    pub position_y: f32,
    pub product: ProductPayload,
}

impl From<&Pin> for PinPayload {
    fn from(pin: &Pin) -> Self {
        Self {
            position_x: pin.position.x,
            position_y: pin.position.y,
            product: ProductPayload {
                product_name: pin.product.name.clone(),
                product_url: pin.product.url.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostImagePayload {
    pub url: String,
    pub pins: Vec<PinPayload>,
}

/// Body of the post-creation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub sub_category: i64,
    pub content: String,
    pub images: Vec<PostImagePayload>,
}

impl From<&Submission> for CreatePostRequest {
    fn from(submission: &Submission) -> Self {
        Self {
            sub_category: submission.category_id,
            content: submission.content.clone(),
            images: submission
                .images
                .iter()
                .map(|image| PostImagePayload {
                    url: image.url.clone(),
                    pins: image.pins.iter().map(PinPayload::from).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPost {
    pub id: i64,
}
