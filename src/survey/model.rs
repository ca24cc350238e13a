//! Organization profile collected on the intake page.

use serde::{Deserialize, Serialize};

/// Declare a closed set of intake choices.
///
/// Each variant serializes as its display label, so JSON clients send and
/// receive exactly the strings shown on the form.
macro_rules! closed_choice {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            /// Every choice, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|c| c.label()).collect()
            }
        }

        impl Default for $name {
            /// The first choice is preselected on the form.
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

closed_choice! {
    /// Industry segment.
    Domain {
        Pharmaceuticals => "Pharmaceuticals",
        Biotechnology => "Biotechnology",
        MedicalDevices => "Medical Devices",
        HealthcareProviders => "Healthcare Providers",
        Cro => "CRO (Contract Research Organizations)",
    }
}

closed_choice! {
    /// Headcount bracket shared by the data and AI team questions.
    TeamSize {
        None => "None",
        OneToFive => "1-5",
        SixToTen => "6-10",
        ElevenToTwenty => "11-20",
        TwentyOneToFifty => "21-50",
        FiftyOnePlus => "51+",
    }
}

closed_choice! {
    OrganizationSize {
        UnderFifty => "Less than 50 employees",
        UpTo200 => "51-200 employees",
        UpTo500 => "201-500 employees",
        UpTo1000 => "501-1000 employees",
        Over1000 => "Over 1000 employees",
    }
}

closed_choice! {
    /// Annual revenue in INR crores.
    AnnualRevenue {
        UnderTen => "Less than ₹10 Crores",
        TenToFifty => "₹10 Crores - ₹50 Crores",
        FiftyTo200 => "₹50 Crores - ₹200 Crores",
        TwoHundredTo1000 => "₹200 Crores - ₹1000 Crores",
        Over1000 => "Over ₹1000 Crores",
    }
}

closed_choice! {
    CustomerType {
        B2b => "B2B (Business to Business)",
        B2c => "B2C (Business to Consumer)",
        Both => "Both B2B and B2C",
        Government => "Government or Public Sector",
        HealthcareProviders => "Healthcare Providers",
        PharmaPartners => "Pharma Partners (e.g., other pharma companies, suppliers)",
    }
}

closed_choice! {
    /// Data generated or processed per day.
    DataVolume {
        UnderOneGb => "Less than 1GB",
        UpToTenGb => "1GB - 10GB",
        UpTo100Gb => "10GB - 100GB",
        UpToOneTb => "100GB - 1TB",
        OverOneTb => "More than 1TB",
    }
}

closed_choice! {
    YesNo {
        Yes => "Yes",
        No => "No",
    }
}

closed_choice! {
    ComplianceStatus {
        Yes => "Yes",
        No => "No",
        Partially => "Partially",
    }
}

closed_choice! {
    LeadershipSupport {
        High => "High commitment – AI is a core part of our business strategy",
        Moderate => "Moderate commitment – AI is growing but not yet fully integrated",
        Limited => "Limited commitment – AI is explored but not a priority",
        NoCommitment => "No commitment – AI is not part of our business strategy",
    }
}

/// Organization profile captured by the intake form.
///
/// Free-text fields accept any string, including empty ones, and the email is
/// not validated. Missing fields fall back to the form defaults so a
/// submission always yields a complete profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub company_name: String,
    pub about_company: String,
    pub email: String,
    pub domain: Domain,
    pub data_team_size: TeamSize,
    pub ai_team_size: TeamSize,
    pub organization_size: OrganizationSize,
    pub annual_revenue: AnnualRevenue,
    pub customer_type: CustomerType,
    pub data_volume: DataVolume,
    pub clinical_trials_data: YesNo,
    pub regulatory_compliance: ComplianceStatus,
    pub ai_leadership_support: LeadershipSupport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
}

/// The closed choice lists offered by the intake form, keyed by field name.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOptions {
    pub domain: Vec<&'static str>,
    pub data_team_size: Vec<&'static str>,
    pub ai_team_size: Vec<&'static str>,
    pub organization_size: Vec<&'static str>,
    pub annual_revenue: Vec<&'static str>,
    pub customer_type: Vec<&'static str>,
    pub data_volume: Vec<&'static str>,
    pub clinical_trials_data: Vec<&'static str>,
    pub regulatory_compliance: Vec<&'static str>,
    pub ai_leadership_support: Vec<&'static str>,
}

impl IntakeOptions {
    pub fn new() -> Self {
        Self {
            domain: Domain::labels(),
            data_team_size: TeamSize::labels(),
            ai_team_size: TeamSize::labels(),
            organization_size: OrganizationSize::labels(),
            annual_revenue: AnnualRevenue::labels(),
            customer_type: CustomerType::labels(),
            data_volume: DataVolume::labels(),
            clinical_trials_data: YesNo::labels(),
            regulatory_compliance: ComplianceStatus::labels(),
            ai_leadership_support: LeadershipSupport::labels(),
        }
    }
}

impl Default for IntakeOptions {
    fn default() -> Self {
        Self::new()
    }
}
