//! Dashboards and analytics derived from the store on every call.

use crate::models::*;
use crate::store::{sum_payments, MarketplaceStore};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct CreatorDashboard {
    pub profile: CreatorProfile,
    pub campaigns: Vec<Campaign>,
    pub total_earnings: f64,
    pub pending_earnings: f64,
    pub total_campaigns: u64,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandDashboard {
    pub profile: BrandProfile,
    pub campaigns: Vec<Campaign>,
    pub total_spent: f64,
    pub pending_amount: f64,
    pub total_campaigns: u64,
    pub active_campaigns: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatorAnalytics {
    pub total_earnings: f64,
    pub campaigns_completed: u64,
    pub total_campaigns: u64,
    pub avg_rating: f64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrandAnalytics {
    pub total_spent: f64,
    pub campaigns_created: u64,
    pub campaigns_completed: u64,
    pub active_campaigns: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignAnalytics {
    pub campaign_id: Uuid,
    pub status: CampaignStatus,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub brand: Option<BrandProfile>,
    pub creator: Option<CreatorProfile>,
    pub submission: Option<Submission>,
}

fn count_where(campaigns: &[Campaign], pred: impl Fn(&Campaign) -> bool) -> u64 {
    campaigns.iter().filter(|c| pred(*c)).count() as u64
}

impl MarketplaceStore {
    pub fn creator_dashboard(&self, user_id: Uuid) -> Option<CreatorDashboard> {
        let profile = self.get_creator_profile_by_user_id(user_id)?;
        let campaigns = self.get_campaigns_by_creator(profile.id);
        let payments = self.get_payments_by_user(user_id);

        Some(CreatorDashboard {
            total_earnings: sum_payments(payments.iter().cloned(), PaymentStatus::Released),
            pending_earnings: sum_payments(payments, PaymentStatus::Escrowed),
            total_campaigns: campaigns.len() as u64,
            rating: profile.rating,
            profile,
            campaigns,
        })
    }

    pub fn brand_dashboard(&self, user_id: Uuid) -> Option<BrandDashboard> {
        let profile = self.get_brand_profile_by_user_id(user_id)?;
        let campaigns = self.get_campaigns_by_brand(profile.id);
        let payments = self.get_payments_by_user(user_id);

        Some(BrandDashboard {
            total_spent: sum_payments(payments.iter().cloned(), PaymentStatus::Released),
            pending_amount: sum_payments(payments, PaymentStatus::Escrowed),
            total_campaigns: campaigns.len() as u64,
            active_campaigns: count_where(&campaigns, |c| c.status.is_active()),
            profile,
            campaigns,
        })
    }

    pub fn creator_analytics(&self, user_id: Uuid) -> Option<CreatorAnalytics> {
        let profile = self.get_creator_profile_by_user_id(user_id)?;
        let campaigns = self.get_campaigns_by_creator(profile.id);

        Some(CreatorAnalytics {
            total_earnings: sum_payments(self.get_payments_by_user(user_id), PaymentStatus::Released),
            campaigns_completed: count_where(&campaigns, |c| c.status == CampaignStatus::Completed),
            total_campaigns: campaigns.len() as u64,
            avg_rating: profile.rating,
            engagement_rate: profile.engagement_rate,
        })
    }

    pub fn brand_analytics(&self, user_id: Uuid) -> Option<BrandAnalytics> {
        let profile = self.get_brand_profile_by_user_id(user_id)?;
        let campaigns = self.get_campaigns_by_brand(profile.id);

        Some(BrandAnalytics {
            total_spent: sum_payments(self.get_payments_by_user(user_id), PaymentStatus::Released),
            campaigns_created: campaigns.len() as u64,
            campaigns_completed: count_where(&campaigns, |c| c.status == CampaignStatus::Completed),
            active_campaigns: count_where(&campaigns, |c| c.status.is_active()),
        })
    }

    /// Engagement of the campaign's submission; zeros until one exists.
    pub fn campaign_analytics(&self, campaign_id: Uuid) -> Option<CampaignAnalytics> {
        let campaign = self.get_campaign(campaign_id)?;
        let submission = self.get_submission_by_campaign(campaign_id);

        Some(match submission {
            Some(s) => CampaignAnalytics {
                campaign_id,
                status: campaign.status,
                views: s.views,
                likes: s.likes,
                comments: s.comments,
                engagement_rate: s.engagement_rate,
            },
            None => CampaignAnalytics {
                campaign_id,
                status: campaign.status,
                views: 0,
                likes: 0,
                comments: 0,
                engagement_rate: 0.0,
            },
        })
    }

    pub fn campaign_detail(&self, campaign_id: Uuid) -> Option<CampaignDetail> {
        let campaign = self.get_campaign(campaign_id)?;
        let brand = self.get_brand_profile_by_id(campaign.brand_id);
        let creator = campaign
            .creator_id
            .and_then(|id| self.get_creator_profile_by_id(id));
        let submission = self.get_submission_by_campaign(campaign_id);

        Some(CampaignDetail { campaign, brand, creator, submission })
    }
}
