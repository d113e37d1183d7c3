//! Marketplace domain types and the typed inputs that create or update them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── User ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Creator,
    Brand,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Creator => "creator",
            UserRole::Brand => "brand",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Produced and verified by the auth layer; never leaves the process.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Either kind of profile, serialized as the bare profile object.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Profile {
    Creator(CreatorProfile),
    Brand(BrandProfile),
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithProfile {
    pub user: User,
    pub profile: Option<Profile>,
}

// ─── Creator Profile ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Pro,
    Premium,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub bio: String,
    pub niche: String,
    pub location: String,
    pub instagram_handle: Option<String>,
    pub youtube_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    pub followers_instagram: u64,
    pub followers_youtube: u64,
    pub followers_tiktok: u64,
    pub engagement_rate: f64,
    pub subscription_tier: SubscriptionTier,
    /// Mean of every review this creator has received; 0.0 before the first.
    pub rating: f64,
    pub total_campaigns: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreatorProfile {
    /// Followers summed across platforms, saturating at `u64::MAX`.
    pub fn total_followers(&self) -> u64 {
        self.followers_instagram
            .saturating_add(self.followers_youtube)
            .saturating_add(self.followers_tiktok)
    }

    pub fn handle(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::Instagram => self.instagram_handle.as_deref(),
            Platform::Youtube => self.youtube_handle.as_deref(),
            Platform::Tiktok => self.tiktok_handle.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCreatorProfile {
    pub name: String,
    pub bio: String,
    pub niche: String,
    pub location: String,
    #[serde(default)]
    pub instagram_handle: Option<String>,
    #[serde(default)]
    pub youtube_handle: Option<String>,
    #[serde(default)]
    pub tiktok_handle: Option<String>,
}

/// Every creator-editable field. Rating, campaign count, ids and
/// timestamps are owned by the store.
///
/// A `Some` handle sets that handle and `None` leaves it as is, so an
/// update never clears a handle. Clearing goes through
/// `MarketplaceStore::upsert_creator_profile`, which replaces all three.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub niche: Option<String>,
    pub location: Option<String>,
    pub instagram_handle: Option<String>,
    pub youtube_handle: Option<String>,
    pub tiktok_handle: Option<String>,
    pub followers_instagram: Option<u64>,
    pub followers_youtube: Option<u64>,
    pub followers_tiktok: Option<u64>,
    pub engagement_rate: Option<f64>,
    pub subscription_tier: Option<SubscriptionTier>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatorSearch {
    pub niche: Option<String>,
    pub location: Option<String>,
    pub min_followers: Option<u64>,
    pub platform: Option<Platform>,
}

// ─── Brand Profile ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub industry: String,
    pub website: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBrandProfile {
    pub company_name: String,
    pub industry: String,
    #[serde(default)]
    pub website: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrandProfileUpdate {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
}

// ─── Campaign ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Open,
    Assigned,
    /// Modelled but not reached by any transition.
    InProgress,
    Submitted,
    Completed,
    /// Modelled but not reached by any transition.
    Cancelled,
}

impl CampaignStatus {
    /// Campaigns still waiting on the creator (counted as "active" on dashboards).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            CampaignStatus::Open | CampaignStatus::Assigned | CampaignStatus::InProgress
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Open => "open",
            CampaignStatus::Assigned => "assigned",
            CampaignStatus::InProgress => "in_progress",
            CampaignStatus::Submitted => "submitted",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CampaignStatus::Open),
            "assigned" => Ok(CampaignStatus::Assigned),
            "in_progress" => Ok(CampaignStatus::InProgress),
            "submitted" => Ok(CampaignStatus::Submitted),
            "completed" => Ok(CampaignStatus::Completed),
            "cancelled" => Ok(CampaignStatus::Cancelled),
            other => Err(format!("unknown campaign status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Campaign {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub creator_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub budget: f64,
    pub platforms: Vec<String>,
    pub duration_days: u32,
    pub status: CampaignStatus,
    pub niche: String,
    pub min_followers: u64,
    pub content_requirements: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCampaign {
    pub title: String,
    pub description: String,
    pub budget: f64,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub duration_days: u32,
    pub niche: String,
    #[serde(default)]
    pub min_followers: u64,
    #[serde(default)]
    pub content_requirements: String,
}

/// Brand-editable campaign fields. Status and assignment only move
/// through the lifecycle operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<f64>,
    pub platforms: Option<Vec<String>>,
    pub duration_days: Option<u32>,
    pub niche: Option<String>,
    pub min_followers: Option<u64>,
    pub content_requirements: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignFilter {
    pub status: Option<CampaignStatus>,
    pub niche: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
}

// ─── Submission ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub content_links: Vec<String>,
    pub notes: String,
    pub submitted_at: DateTime<Utc>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubmission {
    pub content_links: Vec<String>,
    #[serde(default)]
    pub notes: String,
}

/// Engagement numbers reported by an external collector.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionMetrics {
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: f64,
}

// ─── Payment ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Modelled but not reached by any transition.
    Pending,
    Escrowed,
    Released,
    /// Modelled but not reached by any transition.
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_reference: String,
    pub created_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
}

/// Outcome of approving a submitted campaign.
#[derive(Debug, Clone, Serialize)]
pub struct Approval {
    pub campaign: Campaign,
    pub payment: Option<Payment>,
}

// ─── Review ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub creator_id: Uuid,
    pub brand_id: Uuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReview {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

// ─── Monitoring ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CampaignStatusCounts {
    pub open: u64,
    pub assigned: u64,
    pub in_progress: u64,
    pub submitted: u64,
    pub completed: u64,
    pub cancelled: u64,
}

/// Store-wide totals.
#[derive(Debug, Clone, Serialize)]
pub struct MarketplaceOverview {
    pub total_users: u64,
    pub creator_profiles: u64,
    pub brand_profiles: u64,
    pub total_campaigns: u64,
    pub campaigns_by_status: CampaignStatusCounts,
    pub total_submissions: u64,
    pub total_payments: u64,
    pub escrowed_amount: f64,
    pub released_amount: f64,
    pub total_reviews: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&CampaignStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!("in_progress".parse::<CampaignStatus>().unwrap(), CampaignStatus::InProgress);
        assert!("archived".parse::<CampaignStatus>().is_err());
    }

    #[test]
    fn test_active_statuses() {
        assert!(CampaignStatus::Open.is_active());
        assert!(CampaignStatus::InProgress.is_active());
        assert!(!CampaignStatus::Submitted.is_active());
        assert!(!CampaignStatus::Cancelled.is_active());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            password_hash: "secret-hash".into(),
            role: UserRole::Brand,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "brand");
    }

    #[test]
    fn test_total_followers_saturates() {
        let now = Utc::now();
        let profile = CreatorProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Big".into(),
            bio: String::new(),
            niche: "music".into(),
            location: "Nashville".into(),
            instagram_handle: None,
            youtube_handle: None,
            tiktok_handle: None,
            followers_instagram: u64::MAX,
            followers_youtube: 1,
            followers_tiktok: 7,
            engagement_rate: 0.0,
            subscription_tier: SubscriptionTier::Free,
            rating: 0.0,
            total_campaigns: 0,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(profile.total_followers(), u64::MAX);
    }

    #[test]
    fn test_platform_parse_is_case_insensitive() {
        assert_eq!("YouTube".parse::<Platform>().unwrap(), Platform::Youtube);
        assert!("myspace".parse::<Platform>().is_err());
    }
}
