//! Recommendation prompt sent to the generation service.

use chrono::NaiveDate;

use super::maturity::MaturityLevel;
use super::model::Profile;
use super::questions::Questionnaire;

const PRODUCT_URL: &str = "https://valenceai.io";

/// Product capabilities the model is allowed to recommend.
const PRODUCT_CAPABILITIES: &str = "\
Valence Pharma GPT is a secure, configurable AI assistant that enables pharma organizations to:
- Upload voice and media files from field visits or internal teams.
- Transcribe those files with **multilingual and pharma-specific accuracy**.
- Interact with the content using **chat-based Q&A** over transcripts.
- Search across thousands of conversations using **vector database indexing (Qdrant)**.
- Extract real-world insights across therapeutic areas, product feedback, regulatory challenges, and more.";

/// Output structure appended after the assessment context.
const OUTPUT_INSTRUCTIONS: &str = "\
### **Overview**
- Interpret the organization’s current standing based on the score and profile.
- Explain how this reflects their AI maturity across field insights, quality, and regulatory intelligence.

---

### **Strengths**
- Highlight the top 2–3 scoring categories.
- Comment on team readiness or existing digital maturity if relevant.

---

### **Gaps**
- Analyze the lowest-scoring areas.
- Focus on where voice insights, regulatory document extraction, or field feedback structuring are lacking.

---

### **Recommendations**

#### Short-Term (0–6 Months)
- Upload existing voice recordings of field visits to Valence Pharma GPT.
- Generate multilingual, pharma-specific transcripts.
- Begin using chat-based querying to summarize key takeaways.

#### Medium-Term (6–18 Months)
- Start indexing field transcripts for thematic search using vector-powered Qdrant search.
- Tag common product feedback or regulatory risk mentions using GPT-powered auto-tagging.
- Enable multilingual interaction across regions for local sales insights.

#### Long-Term (18+ Months)
- Move toward complete automation: from field voice note to dashboard-ready insights.
- Establish internal SOPs to ingest voice logs directly into the Valence GPT portal for insights.
- Automate PSUR contributions and multilingual summaries from field medical data.

---";

/// Build the recommendation prompt.
///
/// Static template text with field interpolation; no branching on content.
pub fn recommendation_prompt(
    profile: &Profile,
    total_score: u32,
    maturity: MaturityLevel,
    date: NaiveDate,
) -> String {
    let questionnaire = Questionnaire::standard();
    let max_score = questionnaire.max_score();
    let categories: String = questionnaire
        .categories()
        .iter()
        .map(|c| format!("- {c}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\
You are acting as a Senior Consultant specializing in AI and Data Maturity for the Pharmaceutical Industry.

Today’s Date: {date}

The organization has completed a domain-specific assessment designed to evaluate its readiness for advanced AI integration through **Valence Pharma GPT** — a purpose-built GenAI solution for Pharma that transforms unstructured field insights into searchable, actionable, and multilingual intelligence.

---

### 🔍 What is Valence Pharma GPT?
{capabilities}

For live product access and demos, visit: [{url}]({url})

---

### 📊 Assessment Coverage
The following capabilities were evaluated, with each question scored on a 0–3 scale (0 = Minimal, 3 = Advanced):

{categories}

**Organization Profile:**
- **Name**: {company}
- **Domain**: {domain}
- **Size**: {size}
- **Annual Revenue**: {revenue}
- **Data Team Size**: {data_team}
- **AI Team Size**: {ai_team}
- **AI Leadership Support**: {leadership}
- **Regulatory Compliance**: {compliance}
- **Clinical Trials Data Handling**: {clinical}
- **Customer Type**: {customer}
- **Data Volume**: {volume}

**Assessment Score**: {total_score} / {max_score}
**Maturity Level**: {maturity}

---

### 🎯 Your Objective:
Using the organization’s profile and assessment results, generate a maturity diagnosis and a structured action plan using **only the capabilities of Valence Pharma GPT**.

Focus Areas:
1. Identify maturity level and what it means in the pharma data transformation journey.
2. Highlight top strengths based on high-scoring capabilities.
3. Pinpoint bottlenecks in AI utilization or unstructured data analysis.
4. Generate recommendations across:
   - **Short-Term (0–6 months)**: Quick wins aligned with onboarding Valence GPT (e.g., uploading voice logs, generating transcripts).
   - **Medium-Term (6–18 months)**: Strategic adoption of multilingual transcription, searchable insights, or cross-conversation pattern mining.
   - **Long-Term (18+ months)**: Full pipeline automation from field voice input to insight delivery and compliance reporting.

**Do not invent new modules or capabilities. Only refer to features described in Valence Pharma GPT’s current documentation.**

Your tone should be:
- Strategic and pharma-specific
- Clear, executive-style
- Focused on Valence Pharma GPT as the transformation enabler

Conclude with a call to explore [{url}]({url}) to begin their adoption pathway.

### Structure your output under these sections:

---

### **About Valence Pharma GPT**
{capabilities}

For live product access and demos, visit: [{url}]({url})

{instructions}
",
        date = date.format("%d-%B-%Y"),
        capabilities = PRODUCT_CAPABILITIES,
        url = PRODUCT_URL,
        categories = categories,
        company = profile.company_name,
        domain = profile.domain,
        size = profile.organization_size,
        revenue = profile.annual_revenue,
        data_team = profile.data_team_size,
        ai_team = profile.ai_team_size,
        leadership = profile.ai_leadership_support,
        compliance = profile.regulatory_compliance,
        clinical = profile.clinical_trials_data,
        customer = profile.customer_type,
        volume = profile.data_volume,
        total_score = total_score,
        max_score = max_score,
        maturity = maturity,
        instructions = OUTPUT_INSTRUCTIONS,
    )
}
