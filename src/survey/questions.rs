//! The scored questionnaire.
//!
//! Fifteen questions in five categories of three. Every option carries an
//! integer score from 0 to 3, so a complete questionnaire scores 0..=45.

use serde::Serialize;

/// A single multiple-choice question.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub category: &'static str,
    pub text: &'static str,
    /// Option label → score, in display order.
    pub options: &'static [(&'static str, u32)],
    /// Whether several options may be selected at once.
    pub multiple_choice: bool,
}

impl Question {
    /// Score of one option label, if the label belongs to this question.
    pub fn score_of(&self, label: &str) -> Option<u32> {
        self.options
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, s)| *s)
    }

    pub fn option_labels(&self) -> Vec<&'static str> {
        self.options.iter().map(|(l, _)| *l).collect()
    }

    pub fn first_option(&self) -> Option<&'static str> {
        self.options.first().map(|(l, _)| *l)
    }

    pub fn max_score(&self) -> u32 {
        if self.multiple_choice {
            self.options.iter().map(|(_, s)| s).sum()
        } else {
            self.options.iter().map(|(_, s)| *s).max().unwrap_or(0)
        }
    }
}

/// An ordered, read-only question table addressed by a flat index.
///
/// Category boundaries are transparent to indexing: index order is the first
/// category's questions, then the second category's, and so on.
#[derive(Debug, Clone, Copy)]
pub struct Questionnaire {
    questions: &'static [Question],
}

impl Questionnaire {
    pub const fn new(questions: &'static [Question]) -> Self {
        Self { questions }
    }

    /// The pharma AI and data maturity questionnaire.
    pub fn standard() -> Self {
        Self::new(&STANDARD_QUESTIONS)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn last_index(&self) -> usize {
        self.questions.len().saturating_sub(1)
    }

    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(Question::max_score).sum()
    }

    /// Category labels in first-appearance order.
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for q in self.questions {
            if !seen.contains(&q.category) {
                seen.push(q.category);
            }
        }
        seen
    }
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::standard()
    }
}

const FIELD_INTELLIGENCE: &str = "Field Intelligence & Real-World Insights";
const DOMAIN_APPLICATIONS: &str = "Domain-Specific AI Applications";
const DATA_PROCESSING: &str = "Data Processing & Quality";
const USER_EXPERIENCE: &str = "User Experience & Adoption";
const INTEGRATION: &str = "Integration & Scalability";

pub static STANDARD_QUESTIONS: [Question; 15] = [
    Question {
        category: FIELD_INTELLIGENCE,
        text: "1. How effectively is your organization capturing real-world insights from doctor and chemist visits?",
        options: &[
            ("(a) Minimal - No systematic collection of field insights", 0),
            ("(b) Basic - Manual documentation with limited utilization", 1),
            ("(c) Moderate - Structured collection with partial digital transformation", 2),
            ("(d) Advanced - Comprehensive digital capture with AI-enabled analysis", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: FIELD_INTELLIGENCE,
        text: "2. To what extent are voice notes and unstructured data from field teams converted into actionable insights?",
        options: &[
            ("(a) Not utilized - Voice data rarely captured or analyzed", 0),
            ("(b) Limited - Basic transcription without systematic analysis", 1),
            ("(c) Developing - Regular transcription with semi-automated analysis", 2),
            ("(d) Sophisticated - Automated transcription with AI-powered insights extraction", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: FIELD_INTELLIGENCE,
        text: "3. How effectively is your organization utilizing GenAI models to analyze field intelligence data?",
        options: &[
            ("(a) <10% utilization - Minimal AI integration for field data", 0),
            ("(b) 10-30% utilization - Basic AI implementation for specific insights", 1),
            ("(c) 31-60% utilization - Moderate AI integration across multiple field data types", 2),
            ("(d) >60% utilization - Extensive AI-powered analysis of field intelligence", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: DOMAIN_APPLICATIONS,
        text: "4. How effectively is AI employed to identify and adapt to evolving pharmaceutical trends and insights?",
        options: &[
            ("(a) Not implemented - No dynamic parameter identification", 0),
            ("(b) Basic application - Limited trend identification capabilities", 1),
            ("(c) Moderate implementation - Regular trend identification with some adaptation", 2),
            ("(d) Advanced system - Agentic AI with dynamic parameter identification", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: DOMAIN_APPLICATIONS,
        text: "5. To what extent are your AI systems customized specifically for pharmaceutical domain knowledge?",
        options: &[
            ("(a) Generic AI systems with no domain customization", 0),
            ("(b) Limited customization for basic pharmaceutical terminology", 1),
            ("(c) Moderate domain adaptation with pharmaceutical-specific training", 2),
            ("(d) Comprehensive domain-specific models with deep pharmaceutical knowledge", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: DOMAIN_APPLICATIONS,
        text: "6. How sophisticated is your organization's use of AI for persona analysis in healthcare professional engagement?",
        options: &[
            ("(a) Not utilized - Traditional segmentation approaches only", 0),
            ("(b) Basic implementation - Simple AI-based segmentation", 1),
            ("(c) Moderate utilization - AI-driven persona development", 2),
            ("(d) Advanced application - Dynamic persona analysis with behavioral insights", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: DATA_PROCESSING,
        text: "7. How effectively does your organization maintain consistency and accuracy when processing large volumes of voice data?",
        options: &[
            ("(a) Inconsistent quality with significant error rates", 0),
            ("(b) Basic quality control with manual verification", 1),
            ("(c) Structured quality assurance with moderate consistency", 2),
            ("(d) Advanced quality management with high accuracy at scale", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: DATA_PROCESSING,
        text: "8. To what extent has your organization implemented vector databases for efficient retrieval of pharmaceutical insights?",
        options: &[
            ("(a) Not implemented - Traditional databases only", 0),
            ("(b) Early exploration - Limited vector search capabilities", 1),
            ("(c) Partial implementation - Vector databases for select applications", 2),
            ("(d) Full implementation - Comprehensive vector search infrastructure", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: DATA_PROCESSING,
        text: "9. How sophisticated is your transcription capability for converting field audio into analyzable text?",
        options: &[
            ("(a) Basic or non-existent - Limited transcription capabilities", 0),
            ("(b) Standard transcription with moderate accuracy", 1),
            ("(c) Advanced transcription with multilingual support", 2),
            ("(d) High-performance transcription with contextual understanding", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: USER_EXPERIENCE,
        text: "10. How would you rate the user experience of AI tools for your field teams and managers?",
        options: &[
            ("(a) Complex and difficult to use, limiting adoption", 0),
            ("(b) Functional but requiring significant training", 1),
            ("(c) User-friendly with moderate learning curve", 2),
            ("(d) Highly intuitive with excellent usability driving widespread adoption", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: USER_EXPERIENCE,
        text: "11. To what degree can users interact conversationally with your data systems for instant analysis?",
        options: &[
            ("(a) No conversational capabilities - Traditional query methods only", 0),
            ("(b) Limited chat functionality with basic responses", 1),
            ("(c) Moderate conversational abilities for standard queries", 2),
            ("(d) Advanced conversational AI with deep analytical capabilities", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: USER_EXPERIENCE,
        text: "12. How effectively are pre-built AI modules deployed for common pharmaceutical use cases?",
        options: &[
            ("(a) Not available - Custom solutions required for each use case", 0),
            ("(b) Limited availability - Basic modules with minimal customization", 1),
            ("(c) Moderate deployment - Several modules with configuration options", 2),
            ("(d) Comprehensive library - Extensive pre-built modules with deep customization", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: INTEGRATION,
        text: "13. How well integrated are your AI systems with existing pharmaceutical workflows and processes?",
        options: &[
            ("(a) Minimal integration - AI systems operate in isolation", 0),
            ("(b) Partial integration - Basic connections to select workflows", 1),
            ("(c) Substantial integration - AI embedded in multiple critical processes", 2),
            ("(d) Seamless integration - AI fully incorporated into daily operations", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: INTEGRATION,
        text: "14. How effectively can your AI infrastructure scale to accommodate growing volumes of field data?",
        options: &[
            ("(a) Limited scalability - Performance issues with increased data", 0),
            ("(b) Moderate scalability - Can handle growth with some constraints", 1),
            ("(c) Good scalability - Designed for significant data volume increases", 2),
            ("(d) Excellent scalability - Robust architecture for enterprise-scale data", 3),
        ],
        multiple_choice: false,
    },
    Question {
        category: INTEGRATION,
        text: "15. How comprehensively does your organization secure sensitive data in AI applications?",
        options: &[
            ("(a) Basic security measures with significant vulnerabilities", 0),
            ("(b) Standard security protocols with some gaps", 1),
            ("(c) Advanced security framework with strong protections", 2),
            ("(d) Enterprise-grade security with complete compliance coverage", 3),
        ],
        multiple_choice: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_shape() {
        let q = Questionnaire::standard();
        assert_eq!(q.len(), 15);
        assert_eq!(q.last_index(), 14);
        assert_eq!(q.categories().len(), 5);
        for category in q.categories() {
            let count = q.questions().iter().filter(|x| x.category == category).count();
            assert_eq!(count, 3, "{category} should hold three questions");
        }
    }

    #[test]
    fn standard_max_score_is_45() {
        assert_eq!(Questionnaire::standard().max_score(), 45);
    }

    #[test]
    fn every_question_scores_zero_to_three_in_order() {
        for q in Questionnaire::standard().questions() {
            let scores: Vec<u32> = q.options.iter().map(|(_, s)| *s).collect();
            assert_eq!(scores, vec![0, 1, 2, 3], "{}", q.text);
            assert!(!q.multiple_choice);
        }
    }

    #[test]
    fn category_order_is_flat_index_order() {
        let q = Questionnaire::standard();
        assert_eq!(q.get(0).unwrap().category, FIELD_INTELLIGENCE);
        assert_eq!(q.get(3).unwrap().category, DOMAIN_APPLICATIONS);
        assert_eq!(q.get(14).unwrap().category, INTEGRATION);
        assert!(q.get(15).is_none());
    }

    #[test]
    fn score_of_unknown_label_is_none() {
        let q = Questionnaire::standard().get(0).unwrap();
        assert_eq!(q.score_of("(c) Moderate - Structured collection with partial digital transformation"), Some(2));
        assert_eq!(q.score_of("(e) Nonexistent"), None);
    }

    #[test]
    fn multiple_choice_max_sums_all_options() {
        let q = Question {
            category: "Tools",
            text: "Which tools?",
            options: &[("A", 1), ("B", 2), ("C", 0)],
            multiple_choice: true,
        };
        assert_eq!(q.max_score(), 3);
    }
}
