//! Prompt builders and response schemas for the generative backend.
//!
//! The two structured calls constrain the response at the transport
//! boundary with a JSON schema; the prompts still spell out the rules
//! because the schema cannot express content policy (no fabrication,
//! reorder-don't-invent).

use serde_json::{json, Value};

/// Response schema for job analysis.
pub fn job_analysis_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "match_score": {
                "type": "integer",
                "minimum": 0,
                "maximum": 100,
                "description": "How well the candidate matches the job requirements (0-100)"
            },
            "matching_skills": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Skills the candidate has that match the job requirements"
            },
            "missing_skills": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Skills the job requires that the candidate may be lacking"
            },
            "relevant_experiences": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Candidate's experiences that are relevant to this job"
            },
            "suggestions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Actionable suggestions for tailoring the CV"
            },
            "keywords_to_include": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Important keywords from the job description to include in the CV"
            }
        },
        "required": [
            "match_score",
            "matching_skills",
            "missing_skills",
            "relevant_experiences",
            "suggestions",
            "keywords_to_include"
        ]
    })
}

/// Response schema for tailored documents (JSON Resume shape).
pub fn resume_document_schema() -> Value {
    fn string_array() -> Value {
        json!({ "type": "array", "items": { "type": "string" } })
    }
    json!({
        "type": "object",
        "properties": {
            "basics": {
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "label": { "type": "string" },
                    "email": { "type": "string" },
                    "phone": { "type": "string" },
                    "url": { "type": "string" },
                    "summary": { "type": "string" },
                    "location": {
                        "type": "object",
                        "properties": {
                            "address": { "type": "string" },
                            "postalCode": { "type": "string" },
                            "city": { "type": "string" },
                            "countryCode": { "type": "string" },
                            "region": { "type": "string" }
                        }
                    },
                    "profiles": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "network": { "type": "string" },
                                "username": { "type": "string" },
                                "url": { "type": "string" }
                            }
                        }
                    }
                }
            },
            "work": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "position": { "type": "string" },
                        "url": { "type": "string" },
                        "startDate": { "type": "string" },
                        "endDate": { "type": "string" },
                        "summary": { "type": "string" },
                        "highlights": string_array(),
                        "location": { "type": "string" }
                    }
                }
            },
            "volunteer": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "organization": { "type": "string" },
                        "position": { "type": "string" },
                        "url": { "type": "string" },
                        "startDate": { "type": "string" },
                        "endDate": { "type": "string" },
                        "summary": { "type": "string" },
                        "highlights": string_array()
                    }
                }
            },
            "education": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "institution": { "type": "string" },
                        "url": { "type": "string" },
                        "area": { "type": "string" },
                        "studyType": { "type": "string" },
                        "startDate": { "type": "string" },
                        "endDate": { "type": "string" },
                        "score": { "type": "string" },
                        "courses": string_array()
                    }
                }
            },
            "awards": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "date": { "type": "string" },
                        "awarder": { "type": "string" },
                        "summary": { "type": "string" }
                    }
                }
            },
            "certificates": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "date": { "type": "string" },
                        "issuer": { "type": "string" },
                        "url": { "type": "string" }
                    }
                }
            },
            "publications": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "publisher": { "type": "string" },
                        "releaseDate": { "type": "string" },
                        "url": { "type": "string" },
                        "summary": { "type": "string" }
                    }
                }
            },
            "skills": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "level": { "type": "string" },
                        "keywords": string_array()
                    }
                }
            },
            "languages": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "language": { "type": "string" },
                        "fluency": { "type": "string" }
                    }
                }
            },
            "interests": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "keywords": string_array()
                    }
                }
            },
            "references": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "reference": { "type": "string" }
                    }
                }
            },
            "projects": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "highlights": string_array(),
                        "keywords": string_array(),
                        "startDate": { "type": "string" },
                        "endDate": { "type": "string" },
                        "url": { "type": "string" },
                        "roles": string_array(),
                        "entity": { "type": "string" },
                        "type": { "type": "string" }
                    }
                }
            }
        }
    })
}

pub fn build_job_analysis_prompt(profile_json: &str, job_description: &str) -> String {
    format!(
        "You are a career advisor analyzing job fit. Compare the candidate's profile with the job requirements.\n\
        \n\
        Candidate Profile (JSON Resume format):\n\
        {profile_json}\n\
        \n\
        Job Description:\n\
        {job_description}\n\
        \n\
        Analyze the candidate's fit for this role. Consider:\n\
        1. Technical skills and their proficiency levels\n\
        2. Work experience relevance and seniority\n\
        3. Education background\n\
        4. Projects that demonstrate relevant abilities\n\
        5. Certifications that add value\n\
        \n\
        Provide:\n\
        - A match score from 0-100 (be realistic, not overly generous)\n\
        - Skills the candidate has that match the job\n\
        - Skills the job requires that the candidate may lack or need to highlight better\n\
        - Relevant experiences from their background\n\
        - Actionable suggestions for tailoring their CV\n\
        - Important keywords from the job description they should include\n\
        \n\
        Focus on being helpful and constructive. If the match isn't perfect, suggest how to best present their existing experience."
    )
}

pub fn build_tailoring_prompt(
    profile_json: &str,
    job_description: &str,
    analysis_json: &str,
) -> String {
    format!(
        "You are an expert resume writer. Create a tailored resume based on the candidate's master profile and the target job.\n\
        \n\
        Master Profile (JSON Resume format):\n\
        {profile_json}\n\
        \n\
        Target Job Description:\n\
        {job_description}\n\
        \n\
        Job Analysis:\n\
        {analysis_json}\n\
        \n\
        Create a tailored JSON Resume that:\n\
        1. Rewrites the summary to directly address the job requirements and highlight the most relevant qualifications\n\
        2. Reorders work experience to put the most relevant positions first\n\
        3. Adjusts work experience highlights/bullet points to emphasize accomplishments relevant to this job\n\
        4. Prioritizes and reorders skills to put the most relevant ones first\n\
        5. Includes relevant projects that demonstrate required abilities\n\
        6. Incorporates keywords from the job description naturally\n\
        \n\
        CRITICAL RULES:\n\
        - Do NOT invent or fabricate any experience, education, skills, or achievements\n\
        - Only use information that exists in the original profile\n\
        - You may rephrase and emphasize existing content, but never add fictional content\n\
        - Quantify achievements where data exists in the original profile\n\
        - Keep all dates, company names, and factual information accurate\n\
        \n\
        Return a valid JSON Resume. Do not include any markdown formatting or code blocks."
    )
}

pub fn build_cover_letter_prompt(
    profile_json: &str,
    job_title: &str,
    company_name: &str,
    job_description: &str,
    cv_summary: Option<&str>,
) -> String {
    let summary_block = match cv_summary {
        Some(summary) if !summary.trim().is_empty() => {
            format!("\nTailored CV Summary (use this framing):\n{summary}\n")
        }
        _ => String::new(),
    };

    format!(
        "You are an expert cover letter writer. Write a cover letter for the candidate below.\n\
        \n\
        Candidate Profile (JSON Resume format):\n\
        {profile_json}\n\
        \n\
        Position: {job_title}\n\
        Company: {company_name}\n\
        \n\
        Job Description:\n\
        {job_description}\n\
        {summary_block}\
        \n\
        Requirements:\n\
        - Three to four paragraphs, professional but warm tone\n\
        - Open with genuine interest in the specific role and company\n\
        - Draw on the candidate's actual experience; do not invent anything\n\
        - Close with a clear call to action\n\
        - Return only the letter body, no subject line, no placeholders like [Your Name]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_schema_requires_all_fields() {
        let schema = job_analysis_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 6);
        for field in required {
            assert!(schema["properties"][field.as_str().unwrap()].is_object());
        }
    }

    #[test]
    fn test_resume_schema_covers_all_twelve_sections() {
        let schema = resume_document_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 12);
        for name in crate::models::resume::SectionName::ALL {
            assert!(properties.contains_key(name.as_str()), "missing {name}");
        }
    }

    #[test]
    fn test_cover_letter_prompt_includes_summary_only_when_present() {
        let with = build_cover_letter_prompt("{}", "Engineer", "Acme", "jd", Some("summary text"));
        assert!(with.contains("summary text"));
        let without = build_cover_letter_prompt("{}", "Engineer", "Acme", "jd", None);
        assert!(!without.contains("Tailored CV Summary"));
        let blank = build_cover_letter_prompt("{}", "Engineer", "Acme", "jd", Some("  "));
        assert!(!blank.contains("Tailored CV Summary"));
    }
}
