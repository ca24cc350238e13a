//! The finished assessment record.

use chrono::{DateTime, Utc};

use crate::survey::{MaturityLevel, Profile, Questionnaire, ResponseSet};
use crate::warehouse::WarehouseRow;

/// Profile, score, classification, answers and generated recommendation.
/// Created once when the assessment completes and never mutated.
#[derive(Debug, Clone)]
pub struct ReportRecord {
    pub profile: Profile,
    pub total_score: u32,
    pub maturity: MaturityLevel,
    pub responses: ResponseSet,
    pub recommendations: String,
    pub created_at: DateTime<Utc>,
}

impl ReportRecord {
    pub fn maturity_label(&self) -> &'static str {
        self.maturity.label()
    }

    /// Score as shown to the user, e.g. `"27 / 45"`.
    pub fn score_display(&self) -> String {
        format!("{} / {}", self.total_score, Questionnaire::standard().max_score())
    }

    /// Flatten into the fixed warehouse schema.
    pub fn to_warehouse_row(&self) -> Result<WarehouseRow, serde_json::Error> {
        let p = &self.profile;
        Ok(WarehouseRow {
            timestamp: self.created_at.to_rfc3339(),
            name: p.name.clone(),
            company_name: p.company_name.clone(),
            about_company: p.about_company.clone(),
            email: p.email.clone(),
            domain: p.domain.label().to_string(),
            data_team_size: p.data_team_size.label().to_string(),
            ai_team_size: p.ai_team_size.label().to_string(),
            organization_size: p.organization_size.label().to_string(),
            annual_revenue: p.annual_revenue.label().to_string(),
            customer_type: p.customer_type.label().to_string(),
            data_volume: p.data_volume.label().to_string(),
            ai_leadership_support: p.ai_leadership_support.label().to_string(),
            total_score: i64::from(self.total_score),
            maturity_level: self.maturity_label().to_string(),
            reponse: self.responses.to_json_pretty()?,
            recommendations: self.recommendations.clone(),
        })
    }
}
