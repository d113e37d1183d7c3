//! In-memory marketplace store backed by DashMap.
//!
//! Primary maps hold each entity kind; secondary indexes (email, user,
//! brand, creator, campaign) are kept next to them so the known access
//! patterns never scan. Lookups return `Option`; mutations that can be
//! refused return `MarketplaceResult`. Ownership and permission checks
//! belong to the caller.

use crate::models::*;
use chrono::{DateTime, Duration, Utc};
use creator_trust_core::config::MarketplaceConfig;
use creator_trust_core::{MarketplaceError, MarketplaceResult};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Thread-safe in-memory store for users, profiles, campaigns, submissions, payments and reviews.
pub struct MarketplaceStore {
    config: MarketplaceConfig,

    users: DashMap<Uuid, User>,
    creator_profiles: DashMap<Uuid, CreatorProfile>,
    brand_profiles: DashMap<Uuid, BrandProfile>,
    campaigns: DashMap<Uuid, Campaign>,
    submissions: DashMap<Uuid, Submission>,
    payments: DashMap<Uuid, Payment>,
    reviews: DashMap<Uuid, Review>,

    users_by_email: DashMap<String, Uuid>,
    /// user_id -> creator or brand profile id
    profile_by_user: DashMap<Uuid, Uuid>,
    campaigns_by_brand: DashMap<Uuid, Vec<Uuid>>,
    campaigns_by_creator: DashMap<Uuid, Vec<Uuid>>,
    submission_by_campaign: DashMap<Uuid, Uuid>,
    payments_by_campaign: DashMap<Uuid, Vec<Uuid>>,
    review_by_campaign: DashMap<Uuid, Uuid>,
    reviews_by_creator: DashMap<Uuid, Vec<Uuid>>,
}

impl MarketplaceStore {
    pub fn new(config: &MarketplaceConfig) -> Self {
        info!(
            payment_reference_prefix = %config.payment_reference_prefix,
            rating_precision = config.rating_precision,
            "Marketplace store initialized (in-memory)"
        );
        Self {
            config: config.clone(),
            users: DashMap::new(),
            creator_profiles: DashMap::new(),
            brand_profiles: DashMap::new(),
            campaigns: DashMap::new(),
            submissions: DashMap::new(),
            payments: DashMap::new(),
            reviews: DashMap::new(),
            users_by_email: DashMap::new(),
            profile_by_user: DashMap::new(),
            campaigns_by_brand: DashMap::new(),
            campaigns_by_creator: DashMap::new(),
            submission_by_campaign: DashMap::new(),
            payments_by_campaign: DashMap::new(),
            review_by_campaign: DashMap::new(),
            reviews_by_creator: DashMap::new(),
        }
    }

    // ─── Users ─────────────────────────────────────────────────────────────

    /// Register a user. The email is reserved atomically; a second
    /// registration with the same email is a `Conflict`.
    pub fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        role: UserRole,
    ) -> MarketplaceResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
            updated_at: now,
        };

        match self.users_by_email.entry(user.email.clone()) {
            Entry::Occupied(_) => {
                warn!(email, "Registration rejected, email already registered");
                return Err(MarketplaceError::Conflict(format!(
                    "email already registered: {email}"
                )));
            }
            Entry::Vacant(slot) => {
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
            }
        }

        info!(user_id = %user.id, role = role.as_str(), "User created");
        metrics::counter!("marketplace.users.created", "role" => role.as_str()).increment(1);
        Ok(user)
    }

    pub fn get_user_by_id(&self, user_id: Uuid) -> Option<User> {
        self.users.get(&user_id).map(|r| r.value().clone())
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<User> {
        let user_id = self.users_by_email.get(email).map(|r| *r.value())?;
        self.get_user_by_id(user_id)
    }

    /// The user together with the profile matching its role, if one exists.
    pub fn get_user_with_profile(&self, user_id: Uuid) -> Option<UserWithProfile> {
        let user = self.get_user_by_id(user_id)?;
        let profile = match user.role {
            UserRole::Creator => self.get_creator_profile_by_user_id(user_id).map(Profile::Creator),
            UserRole::Brand => self.get_brand_profile_by_user_id(user_id).map(Profile::Brand),
        };
        Some(UserWithProfile { user, profile })
    }

    fn require_role(&self, user_id: Uuid, role: UserRole) -> MarketplaceResult<()> {
        let user = self
            .get_user_by_id(user_id)
            .ok_or_else(|| MarketplaceError::not_found("user", user_id))?;
        if user.role != role {
            return Err(MarketplaceError::WrongRole(format!(
                "user {user_id} is a {}, not a {}",
                user.role.as_str(),
                role.as_str()
            )));
        }
        Ok(())
    }

    fn profile_id(&self, user_id: Uuid) -> Option<Uuid> {
        self.profile_by_user.get(&user_id).map(|r| *r.value())
    }

    // ─── Creator Profiles ──────────────────────────────────────────────────

    pub fn create_creator_profile(
        &self,
        user_id: Uuid,
        input: NewCreatorProfile,
    ) -> MarketplaceResult<CreatorProfile> {
        self.require_role(user_id, UserRole::Creator)?;

        let now = Utc::now();
        let profile = CreatorProfile {
            id: Uuid::new_v4(),
            user_id,
            name: input.name,
            bio: input.bio,
            niche: input.niche,
            location: input.location,
            instagram_handle: input.instagram_handle,
            youtube_handle: input.youtube_handle,
            tiktok_handle: input.tiktok_handle,
            followers_instagram: 0,
            followers_youtube: 0,
            followers_tiktok: 0,
            engagement_rate: 0.0,
            subscription_tier: SubscriptionTier::Free,
            rating: 0.0,
            total_campaigns: 0,
            created_at: now,
            updated_at: now,
        };

        match self.profile_by_user.entry(user_id) {
            Entry::Occupied(_) => {
                return Err(MarketplaceError::Conflict(format!(
                    "user {user_id} already has a profile"
                )));
            }
            Entry::Vacant(slot) => {
                self.creator_profiles.insert(profile.id, profile.clone());
                slot.insert(profile.id);
            }
        }

        info!(user_id = %user_id, profile_id = %profile.id, "Creator profile created");
        Ok(profile)
    }

    pub fn update_creator_profile(
        &self,
        user_id: Uuid,
        update: CreatorProfileUpdate,
    ) -> Option<CreatorProfile> {
        let profile_id = self.profile_id(user_id)?;
        self.creator_profiles.get_mut(&profile_id).map(|mut entry| {
            let p = entry.value_mut();
            if let Some(name) = update.name { p.name = name; }
            if let Some(bio) = update.bio { p.bio = bio; }
            if let Some(niche) = update.niche { p.niche = niche; }
            if let Some(location) = update.location { p.location = location; }
            if let Some(handle) = update.instagram_handle { p.instagram_handle = Some(handle); }
            if let Some(handle) = update.youtube_handle { p.youtube_handle = Some(handle); }
            if let Some(handle) = update.tiktok_handle { p.tiktok_handle = Some(handle); }
            if let Some(n) = update.followers_instagram { p.followers_instagram = n; }
            if let Some(n) = update.followers_youtube { p.followers_youtube = n; }
            if let Some(n) = update.followers_tiktok { p.followers_tiktok = n; }
            if let Some(rate) = update.engagement_rate { p.engagement_rate = rate; }
            if let Some(tier) = update.subscription_tier { p.subscription_tier = tier; }
            p.updated_at = Utc::now();
            p.clone()
        })
    }

    /// Replace the creator-supplied fields of an existing profile, or create
    /// the profile when the user has none yet.
    pub fn upsert_creator_profile(
        &self,
        user_id: Uuid,
        input: NewCreatorProfile,
    ) -> MarketplaceResult<CreatorProfile> {
        if let Some(profile_id) = self.profile_id(user_id) {
            if let Some(mut entry) = self.creator_profiles.get_mut(&profile_id) {
                let p = entry.value_mut();
                p.name = input.name;
                p.bio = input.bio;
                p.niche = input.niche;
                p.location = input.location;
                p.instagram_handle = input.instagram_handle;
                p.youtube_handle = input.youtube_handle;
                p.tiktok_handle = input.tiktok_handle;
                p.updated_at = Utc::now();
                return Ok(p.clone());
            }
        }
        self.create_creator_profile(user_id, input)
    }

    pub fn get_creator_profile_by_user_id(&self, user_id: Uuid) -> Option<CreatorProfile> {
        self.profile_id(user_id)
            .and_then(|profile_id| self.get_creator_profile_by_id(profile_id))
    }

    pub fn get_creator_profile_by_id(&self, profile_id: Uuid) -> Option<CreatorProfile> {
        self.creator_profiles.get(&profile_id).map(|r| r.value().clone())
    }

    /// Linear scan over every creator; unset filters match everything.
    pub fn search_creators(&self, query: &CreatorSearch) -> Vec<CreatorProfile> {
        let mut results: Vec<CreatorProfile> = self
            .creator_profiles
            .iter()
            .filter(|r| {
                let profile = r.value();
                if let Some(niche) = &query.niche {
                    if !profile.niche.eq_ignore_ascii_case(niche) {
                        return false;
                    }
                }
                if let Some(location) = &query.location {
                    if !profile.location.eq_ignore_ascii_case(location) {
                        return false;
                    }
                }
                if let Some(min) = query.min_followers {
                    if profile.total_followers() < min {
                        return false;
                    }
                }
                if let Some(platform) = query.platform {
                    if profile.handle(platform).is_none() {
                        return false;
                    }
                }
                true
            })
            .map(|r| r.value().clone())
            .collect();
        results.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        results
    }

    // ─── Brand Profiles ────────────────────────────────────────────────────

    pub fn create_brand_profile(
        &self,
        user_id: Uuid,
        input: NewBrandProfile,
    ) -> MarketplaceResult<BrandProfile> {
        self.require_role(user_id, UserRole::Brand)?;

        let now = Utc::now();
        let profile = BrandProfile {
            id: Uuid::new_v4(),
            user_id,
            company_name: input.company_name,
            industry: input.industry,
            website: input.website,
            description: input.description,
            created_at: now,
            updated_at: now,
        };

        match self.profile_by_user.entry(user_id) {
            Entry::Occupied(_) => {
                return Err(MarketplaceError::Conflict(format!(
                    "user {user_id} already has a profile"
                )));
            }
            Entry::Vacant(slot) => {
                self.brand_profiles.insert(profile.id, profile.clone());
                slot.insert(profile.id);
            }
        }

        info!(user_id = %user_id, profile_id = %profile.id, "Brand profile created");
        Ok(profile)
    }

    pub fn update_brand_profile(
        &self,
        user_id: Uuid,
        update: BrandProfileUpdate,
    ) -> Option<BrandProfile> {
        let profile_id = self.profile_id(user_id)?;
        self.brand_profiles.get_mut(&profile_id).map(|mut entry| {
            let p = entry.value_mut();
            if let Some(name) = update.company_name { p.company_name = name; }
            if let Some(industry) = update.industry { p.industry = industry; }
            if let Some(website) = update.website { p.website = Some(website); }
            if let Some(description) = update.description { p.description = description; }
            p.updated_at = Utc::now();
            p.clone()
        })
    }

    pub fn upsert_brand_profile(
        &self,
        user_id: Uuid,
        input: NewBrandProfile,
    ) -> MarketplaceResult<BrandProfile> {
        if let Some(profile_id) = self.profile_id(user_id) {
            if let Some(mut entry) = self.brand_profiles.get_mut(&profile_id) {
                let p = entry.value_mut();
                p.company_name = input.company_name;
                p.industry = input.industry;
                p.website = input.website;
                p.description = input.description;
                p.updated_at = Utc::now();
                return Ok(p.clone());
            }
        }
        self.create_brand_profile(user_id, input)
    }

    pub fn get_brand_profile_by_user_id(&self, user_id: Uuid) -> Option<BrandProfile> {
        self.profile_id(user_id)
            .and_then(|profile_id| self.get_brand_profile_by_id(profile_id))
    }

    pub fn get_brand_profile_by_id(&self, profile_id: Uuid) -> Option<BrandProfile> {
        self.brand_profiles.get(&profile_id).map(|r| r.value().clone())
    }

    // ─── Campaigns ─────────────────────────────────────────────────────────

    pub fn create_campaign(&self, brand_id: Uuid, input: NewCampaign) -> MarketplaceResult<Campaign> {
        if !self.brand_profiles.contains_key(&brand_id) {
            return Err(MarketplaceError::not_found("brand profile", brand_id));
        }

        let now = Utc::now();
        let deadline = deadline_after(now, input.duration_days)?;
        let campaign = Campaign {
            id: Uuid::new_v4(),
            brand_id,
            creator_id: None,
            title: input.title,
            description: input.description,
            budget: input.budget,
            platforms: input.platforms,
            duration_days: input.duration_days,
            status: CampaignStatus::Open,
            niche: input.niche,
            min_followers: input.min_followers,
            content_requirements: input.content_requirements,
            created_at: now,
            updated_at: now,
            deadline,
        };
        let id = campaign.id;
        self.campaigns.insert(id, campaign.clone());
        self.campaigns_by_brand.entry(brand_id).or_default().push(id);

        info!(campaign_id = %id, brand_id = %brand_id, budget = campaign.budget, "Campaign created");
        metrics::counter!("marketplace.campaigns.created").increment(1);
        Ok(campaign)
    }

    pub fn get_campaign(&self, campaign_id: Uuid) -> Option<Campaign> {
        self.campaigns.get(&campaign_id).map(|r| r.value().clone())
    }

    /// Apply a brand edit. A new `duration_days` is validated before any
    /// field changes, so a rejected update leaves the campaign untouched.
    pub fn update_campaign(
        &self,
        campaign_id: Uuid,
        update: CampaignUpdate,
    ) -> MarketplaceResult<Campaign> {
        let mut entry = self
            .campaigns
            .get_mut(&campaign_id)
            .ok_or_else(|| MarketplaceError::not_found("campaign", campaign_id))?;
        let c = entry.value_mut();
        let deadline = update
            .duration_days
            .map(|days| deadline_after(c.created_at, days))
            .transpose()?;

        if let Some(title) = update.title { c.title = title; }
        if let Some(description) = update.description { c.description = description; }
        if let Some(budget) = update.budget { c.budget = budget; }
        if let Some(platforms) = update.platforms { c.platforms = platforms; }
        if let Some(niche) = update.niche { c.niche = niche; }
        if let Some(min) = update.min_followers { c.min_followers = min; }
        if let Some(req) = update.content_requirements { c.content_requirements = req; }
        if let Some(days) = update.duration_days { c.duration_days = days; }
        if let Some(deadline) = deadline { c.deadline = deadline; }
        c.updated_at = Utc::now();
        Ok(c.clone())
    }

    pub fn list_campaigns(&self, filter: &CampaignFilter) -> Vec<Campaign> {
        let mut campaigns: Vec<Campaign> = self
            .campaigns
            .iter()
            .filter(|r| {
                let campaign = r.value();
                if let Some(status) = filter.status {
                    if campaign.status != status {
                        return false;
                    }
                }
                if let Some(niche) = &filter.niche {
                    if !campaign.niche.eq_ignore_ascii_case(niche) {
                        return false;
                    }
                }
                if let Some(min) = filter.budget_min {
                    if campaign.budget < min {
                        return false;
                    }
                }
                if let Some(max) = filter.budget_max {
                    if campaign.budget > max {
                        return false;
                    }
                }
                true
            })
            .map(|r| r.value().clone())
            .collect();
        campaigns.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        campaigns
    }

    pub fn get_campaigns_by_brand(&self, brand_id: Uuid) -> Vec<Campaign> {
        let ids = self
            .campaigns_by_brand
            .get(&brand_id)
            .map(|r| r.value().clone())
            .unwrap_or_default();
        self.collect_campaigns(&ids)
    }

    pub fn get_campaigns_by_creator(&self, creator_id: Uuid) -> Vec<Campaign> {
        let ids = self
            .campaigns_by_creator
            .get(&creator_id)
            .map(|r| r.value().clone())
            .unwrap_or_default();
        self.collect_campaigns(&ids)
    }

    fn collect_campaigns(&self, ids: &[Uuid]) -> Vec<Campaign> {
        ids.iter().filter_map(|id| self.get_campaign(*id)).collect()
    }

    /// open -> assigned. The creator profile must exist.
    pub fn assign_campaign(&self, campaign_id: Uuid, creator_id: Uuid) -> MarketplaceResult<Campaign> {
        if !self.creator_profiles.contains_key(&creator_id) {
            return Err(MarketplaceError::not_found("creator profile", creator_id));
        }

        let campaign = {
            let mut entry = self
                .campaigns
                .get_mut(&campaign_id)
                .ok_or_else(|| MarketplaceError::not_found("campaign", campaign_id))?;
            let c = entry.value_mut();
            if c.status != CampaignStatus::Open {
                return Err(invalid_transition(c, "assign"));
            }
            c.creator_id = Some(creator_id);
            c.status = CampaignStatus::Assigned;
            c.updated_at = Utc::now();
            c.clone()
        };
        self.campaigns_by_creator.entry(creator_id).or_default().push(campaign_id);
        debug!(creator_id = %creator_id, campaign_id = %campaign_id, "Creator index updated");

        info!(campaign_id = %campaign_id, creator_id = %creator_id, "Campaign assigned");
        metrics::counter!("marketplace.campaigns.assigned").increment(1);
        Ok(campaign)
    }

    /// assigned -> submitted, recording the creator's deliverables.
    pub fn submit_campaign(
        &self,
        campaign_id: Uuid,
        input: NewSubmission,
    ) -> MarketplaceResult<Submission> {
        let mut entry = self
            .campaigns
            .get_mut(&campaign_id)
            .ok_or_else(|| MarketplaceError::not_found("campaign", campaign_id))?;
        let c = entry.value_mut();
        if !matches!(c.status, CampaignStatus::Assigned | CampaignStatus::InProgress) {
            return Err(invalid_transition(c, "submit"));
        }

        let now = Utc::now();
        let submission = Submission {
            id: Uuid::new_v4(),
            campaign_id,
            content_links: input.content_links,
            notes: input.notes,
            submitted_at: now,
            views: 0,
            likes: 0,
            comments: 0,
            engagement_rate: 0.0,
        };

        match self.submission_by_campaign.entry(campaign_id) {
            Entry::Occupied(_) => {
                return Err(MarketplaceError::Conflict(format!(
                    "campaign {campaign_id} already has a submission"
                )));
            }
            Entry::Vacant(slot) => {
                self.submissions.insert(submission.id, submission.clone());
                slot.insert(submission.id);
            }
        }
        c.status = CampaignStatus::Submitted;
        c.updated_at = now;
        drop(entry);

        info!(campaign_id = %campaign_id, submission_id = %submission.id, links = submission.content_links.len(), "Campaign submitted");
        metrics::counter!("marketplace.campaigns.submitted").increment(1);
        Ok(submission)
    }

    /// submitted -> completed. Releases the escrowed payment, if any, and
    /// credits the creator with one more completed campaign.
    pub fn approve_campaign(&self, campaign_id: Uuid) -> MarketplaceResult<Approval> {
        let campaign = {
            let mut entry = self
                .campaigns
                .get_mut(&campaign_id)
                .ok_or_else(|| MarketplaceError::not_found("campaign", campaign_id))?;
            let c = entry.value_mut();
            if c.status != CampaignStatus::Submitted {
                return Err(invalid_transition(c, "approve"));
            }
            c.status = CampaignStatus::Completed;
            c.updated_at = Utc::now();
            c.clone()
        };

        let payment = self
            .active_payment_id(campaign_id)
            .and_then(|payment_id| self.release_if_escrowed(payment_id));

        if let Some(creator_id) = campaign.creator_id {
            if let Some(mut creator) = self.creator_profiles.get_mut(&creator_id) {
                creator.total_campaigns += 1;
                creator.updated_at = Utc::now();
            }
        }

        info!(
            campaign_id = %campaign_id,
            payment_released = payment.is_some(),
            "Campaign approved"
        );
        metrics::counter!("marketplace.campaigns.completed").increment(1);
        Ok(Approval { campaign, payment })
    }

    // ─── Submissions ───────────────────────────────────────────────────────

    pub fn get_submission_by_campaign(&self, campaign_id: Uuid) -> Option<Submission> {
        let submission_id = self.submission_by_campaign.get(&campaign_id).map(|r| *r.value())?;
        self.submissions.get(&submission_id).map(|r| r.value().clone())
    }

    pub fn record_submission_metrics(
        &self,
        campaign_id: Uuid,
        metrics: SubmissionMetrics,
    ) -> Option<Submission> {
        let submission_id = self.submission_by_campaign.get(&campaign_id).map(|r| *r.value())?;
        self.submissions.get_mut(&submission_id).map(|mut entry| {
            let s = entry.value_mut();
            s.views = metrics.views;
            s.likes = metrics.likes;
            s.comments = metrics.comments;
            s.engagement_rate = metrics.engagement_rate;
            debug!(campaign_id = %campaign_id, views = s.views, "Submission metrics recorded");
            s.clone()
        })
    }

    // ─── Payments ──────────────────────────────────────────────────────────

    /// Hold `amount` in escrow against a campaign.
    pub fn create_payment(&self, campaign_id: Uuid, amount: f64) -> MarketplaceResult<Payment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(MarketplaceError::Validation(format!(
                "payment amount must be positive, got {amount}"
            )));
        }
        if !self.campaigns.contains_key(&campaign_id) {
            return Err(MarketplaceError::not_found("campaign", campaign_id));
        }

        let id = Uuid::new_v4();
        let short_id = id.simple().to_string();
        let payment = Payment {
            id,
            campaign_id,
            amount,
            status: PaymentStatus::Escrowed,
            payment_reference: format!("{}-{}", self.config.payment_reference_prefix, &short_id[..8]),
            created_at: Utc::now(),
            released_at: None,
        };
        self.payments.insert(id, payment.clone());
        self.payments_by_campaign.entry(campaign_id).or_default().push(id);

        info!(payment_id = %id, campaign_id = %campaign_id, amount, "Payment escrowed");
        metrics::counter!("marketplace.payments.escrowed").increment(1);
        Ok(payment)
    }

    /// escrowed -> released.
    pub fn release_payment(&self, payment_id: Uuid) -> MarketplaceResult<Payment> {
        let mut entry = self
            .payments
            .get_mut(&payment_id)
            .ok_or_else(|| MarketplaceError::not_found("payment", payment_id))?;
        let p = entry.value_mut();
        if p.status != PaymentStatus::Escrowed {
            warn!(payment_id = %payment_id, status = ?p.status, "Rejected payment release");
            return Err(MarketplaceError::InvalidState(format!(
                "payment {payment_id} is {:?}, only escrowed payments can be released",
                p.status
            )));
        }
        mark_released(p);
        Ok(p.clone())
    }

    fn release_if_escrowed(&self, payment_id: Uuid) -> Option<Payment> {
        let mut entry = self.payments.get_mut(&payment_id)?;
        let p = entry.value_mut();
        if p.status != PaymentStatus::Escrowed {
            return None;
        }
        mark_released(p);
        Some(p.clone())
    }

    pub fn get_payment(&self, payment_id: Uuid) -> Option<Payment> {
        self.payments.get(&payment_id).map(|r| r.value().clone())
    }

    /// The campaign's escrowed payment, or its most recent one when none is escrowed.
    pub fn get_payment_by_campaign(&self, campaign_id: Uuid) -> Option<Payment> {
        let payments = self.get_payments_by_campaign(campaign_id);
        payments
            .iter()
            .rev()
            .find(|p| p.status == PaymentStatus::Escrowed)
            .or_else(|| payments.last())
            .cloned()
    }

    pub fn get_payments_by_campaign(&self, campaign_id: Uuid) -> Vec<Payment> {
        let ids = self
            .payments_by_campaign
            .get(&campaign_id)
            .map(|r| r.value().clone())
            .unwrap_or_default();
        ids.iter().filter_map(|id| self.get_payment(*id)).collect()
    }

    fn active_payment_id(&self, campaign_id: Uuid) -> Option<Uuid> {
        self.get_payments_by_campaign(campaign_id)
            .into_iter()
            .rev()
            .find(|p| p.status == PaymentStatus::Escrowed)
            .map(|p| p.id)
    }

    /// Payments visible to a user: a brand's campaigns, or the campaigns
    /// assigned to a creator. Unknown users and users without a profile see none.
    pub fn get_payments_by_user(&self, user_id: Uuid) -> Vec<Payment> {
        let Some(user) = self.get_user_by_id(user_id) else {
            return Vec::new();
        };
        let campaigns = match user.role {
            UserRole::Brand => self
                .get_brand_profile_by_user_id(user_id)
                .map(|brand| self.get_campaigns_by_brand(brand.id)),
            UserRole::Creator => self
                .get_creator_profile_by_user_id(user_id)
                .map(|creator| self.get_campaigns_by_creator(creator.id)),
        }
        .unwrap_or_default();

        let mut payments: Vec<Payment> = campaigns
            .iter()
            .flat_map(|c| self.get_payments_by_campaign(c.id))
            .collect();
        payments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        payments
    }

    // ─── Reviews ───────────────────────────────────────────────────────────

    /// Review a completed campaign's creator on behalf of its brand. One
    /// review per campaign; the creator's rating is recomputed.
    pub fn create_review(&self, campaign_id: Uuid, input: NewReview) -> MarketplaceResult<Review> {
        if !(1..=5).contains(&input.rating) {
            return Err(MarketplaceError::Validation(format!(
                "rating must be between 1 and 5, got {}",
                input.rating
            )));
        }
        let campaign = self
            .get_campaign(campaign_id)
            .ok_or_else(|| MarketplaceError::not_found("campaign", campaign_id))?;
        if campaign.status != CampaignStatus::Completed {
            return Err(invalid_transition(&campaign, "review"));
        }
        let creator_id = campaign.creator_id.ok_or_else(|| {
            MarketplaceError::InvalidState(format!("campaign {campaign_id} has no assigned creator"))
        })?;

        let review = Review {
            id: Uuid::new_v4(),
            campaign_id,
            creator_id,
            brand_id: campaign.brand_id,
            rating: input.rating,
            comment: input.comment,
            created_at: Utc::now(),
        };

        match self.review_by_campaign.entry(campaign_id) {
            Entry::Occupied(_) => {
                return Err(MarketplaceError::Conflict(format!(
                    "campaign {campaign_id} has already been reviewed"
                )));
            }
            Entry::Vacant(slot) => {
                self.reviews.insert(review.id, review.clone());
                slot.insert(review.id);
            }
        }
        self.reviews_by_creator.entry(creator_id).or_default().push(review.id);
        self.refresh_creator_rating(creator_id);

        info!(review_id = %review.id, creator_id = %creator_id, rating = review.rating, "Review created");
        metrics::counter!("marketplace.reviews.created").increment(1);
        Ok(review)
    }

    pub fn get_reviews_by_creator(&self, creator_id: Uuid) -> Vec<Review> {
        let ids = self
            .reviews_by_creator
            .get(&creator_id)
            .map(|r| r.value().clone())
            .unwrap_or_default();
        ids.iter()
            .filter_map(|id| self.reviews.get(id).map(|r| r.value().clone()))
            .collect()
    }

    pub fn get_review_by_campaign(&self, campaign_id: Uuid) -> Option<Review> {
        let review_id = self.review_by_campaign.get(&campaign_id).map(|r| *r.value())?;
        self.reviews.get(&review_id).map(|r| r.value().clone())
    }

    /// Recompute the mean under the profile's entry lock so concurrent
    /// reviews never leave a stale average behind.
    fn refresh_creator_rating(&self, creator_id: Uuid) {
        let Some(mut entry) = self.creator_profiles.get_mut(&creator_id) else {
            return;
        };
        let ratings: Vec<u8> = self
            .get_reviews_by_creator(creator_id)
            .iter()
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return;
        }
        let mean = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
        let profile = entry.value_mut();
        profile.rating = round_to(mean, self.config.rating_precision);
        profile.updated_at = Utc::now();
        debug!(creator_id = %creator_id, reviews = ratings.len(), rating = profile.rating, "Creator rating recomputed");
    }

    // ─── Monitoring ────────────────────────────────────────────────────────

    pub fn get_overview(&self) -> MarketplaceOverview {
        let mut by_status = CampaignStatusCounts::default();
        for r in self.campaigns.iter() {
            match r.value().status {
                CampaignStatus::Open => by_status.open += 1,
                CampaignStatus::Assigned => by_status.assigned += 1,
                CampaignStatus::InProgress => by_status.in_progress += 1,
                CampaignStatus::Submitted => by_status.submitted += 1,
                CampaignStatus::Completed => by_status.completed += 1,
                CampaignStatus::Cancelled => by_status.cancelled += 1,
            }
        }
        let escrowed_amount = sum_payments(self.payments.iter().map(|r| r.value().clone()), PaymentStatus::Escrowed);
        let released_amount = sum_payments(self.payments.iter().map(|r| r.value().clone()), PaymentStatus::Released);

        MarketplaceOverview {
            total_users: self.users.len() as u64,
            creator_profiles: self.creator_profiles.len() as u64,
            brand_profiles: self.brand_profiles.len() as u64,
            total_campaigns: self.campaigns.len() as u64,
            campaigns_by_status: by_status,
            total_submissions: self.submissions.len() as u64,
            total_payments: self.payments.len() as u64,
            escrowed_amount,
            released_amount,
            total_reviews: self.reviews.len() as u64,
        }
    }
}

impl Default for MarketplaceStore {
    fn default() -> Self {
        Self::new(&MarketplaceConfig::default())
    }
}

fn invalid_transition(campaign: &Campaign, action: &str) -> MarketplaceError {
    warn!(
        campaign_id = %campaign.id,
        status = campaign.status.as_str(),
        action,
        "Rejected campaign transition"
    );
    MarketplaceError::InvalidState(format!(
        "cannot {action} campaign {} in status {}",
        campaign.id,
        campaign.status.as_str()
    ))
}

fn deadline_after(created_at: DateTime<Utc>, duration_days: u32) -> MarketplaceResult<DateTime<Utc>> {
    created_at
        .checked_add_signed(Duration::days(i64::from(duration_days)))
        .ok_or_else(|| {
            MarketplaceError::Validation(format!(
                "duration of {duration_days} days puts the deadline out of range"
            ))
        })
}

fn mark_released(payment: &mut Payment) {
    payment.status = PaymentStatus::Released;
    payment.released_at = Some(Utc::now());
    info!(payment_id = %payment.id, amount = payment.amount, "Payment released");
    metrics::counter!("marketplace.payments.released").increment(1);
}

fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Total amount of the payments in `status`.
pub fn sum_payments(payments: impl IntoIterator<Item = Payment>, status: PaymentStatus) -> f64 {
    payments
        .into_iter()
        .filter(|p| p.status == status)
        .map(|p| p.amount)
        .sum()
}
