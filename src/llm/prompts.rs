// file: src/llm/prompts.rs
// description: prompt templates for summaries, spec extraction and the final report
// reference: single-turn prompting, one request per template

use crate::models::DocumentSummary;

pub const UNKNOWN_URL: &str = "unknown";
pub const NO_SPECS_FOUND: &str = "No specs found.";

pub fn chunk_summary(chunk: &str) -> String {
    format!(
        "Summarize this excerpt in 2-3 short sentences focused on car review insights: \
         main issues, recurring problems, and positives.\n\
         \n\
         Excerpt:\n\
         {chunk}"
    )
}

pub fn combine_chunk_summaries(chunk_summaries: &[String], url: Option<&str>) -> String {
    let combined = chunk_summaries.join("\n\n");
    let url = url.unwrap_or(UNKNOWN_URL);
    format!(
        "Combine these short summaries into a 3-4 sentence summary focused on the main drawbacks, \
         common issues, and main positives.\n\
         Preserve source attribution at the end: {url}\n\
         \n\
         Summaries:\n\
         {combined}"
    )
}

pub fn document_summary(text: &str, url: Option<&str>) -> String {
    let url = url.unwrap_or(UNKNOWN_URL);
    format!(
        "Produce a concise summary of the following document in 2 short paragraphs (2-5 sentences each).\n\
         Focus on: main drawbacks, common mechanical issues (mention relative frequency if present), \
         and main positives.\n\
         End with a single-line source attribution exactly as: Source: {url}\n\
         \n\
         Document:\n\
         {text}"
    )
}

/// `URL: <u>` header per document, documents separated by `---`.
pub fn render_spec_documents(documents: &[(String, String)]) -> String {
    documents
        .iter()
        .map(|(url, text)| format!("URL: {}\n\n{}", url, text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

pub fn spec_extraction(combined_documents: &str) -> String {
    format!(
        "You are given several specification documents for a car. For each document, \
         extract the following fields if present:\n\
         - brand\n\
         - model\n\
         - year_range\n\
         - engine_type_and_displacement\n\
         - horsepower\n\
         - torque\n\
         - fuel_economy\n\
         - acceleration\n\
         - top_speed\n\
         - notable_features (comma separated list)\n\
         \n\
         Output a JSON array with one object per source in the same order. Each object must \
         include \"source_url\" and the fields above (use null for missing fields). Example:\n\
         [\n\
         {{\n\
         \"source_url\": \"...\",\n\
         \"brand\": \"...\",\n\
         \"model\": \"...\",\n\
         \"year_range\": \"...\",\n\
         \"engine_type_and_displacement\": \"...\",\n\
         \"horsepower\": \"...\",\n\
         \"torque\": \"...\",\n\
         \"fuel_economy\": \"...\",\n\
         \"acceleration\": \"...\",\n\
         \"top_speed\": \"...\",\n\
         \"notable_features\": \"...\"\n\
         }},\n\
         ...\n\
         ]\n\
         \n\
         Documents:\n\
         {combined_documents}"
    )
}

/// `From <url>:` blocks separated by blank lines.
pub fn render_summaries(summaries: &[DocumentSummary]) -> String {
    summaries
        .iter()
        .map(|s| {
            format!(
                "From {}:\n{}",
                s.url.as_deref().unwrap_or(UNKNOWN_URL),
                s.summary
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn final_report(label: &str, combined_summaries: &str, specs_document: &str) -> String {
    format!(
        "Using the following per-document summaries and the extracted specification data, \
         produce a 2-3 paragraph concise summary of {label} reviews.\n\
         Focus on: main drawbacks, common mechanical issues (with frequency), and main positives.\n\
         Structure the response exactly as follows:\n\
         \n\
         Brand: [Car Brand]\n\
         Model: [Car Model]\n\
         Year: [Car Year range]\n\
         \n\
         Specifications:\n\
         [list of main specifications from spec sheets: engine type and displacement, horsepower, \
         torque, fuel economy, acceleration, top speed, notable features]\n\
         \n\
         General Overview:\n\
         [Overview paragraph]\n\
         Key Takeaways:\n\
         - [takeaway 1]\n\
         - [takeaway 2]\n\
         \n\
         Main Issues and Drawbacks:\n\
         [Issues paragraph]\n\
         Key Takeaways:\n\
         - [takeaway 1]\n\
         - [takeaway 2]\n\
         \n\
         Main Positives:\n\
         [Positives paragraph]\n\
         Key Takeaways:\n\
         - [takeaway 1]\n\
         - [takeaway 2]\n\
         \n\
         TLDR:\n\
         [2-4 sentence summary]\n\
         \n\
         Sources:\n\
         [list of source URLs supporting major points]\n\
         \n\
         Documents:\n\
         {combined_summaries}\n\
         \n\
         Extracted Specifications (JSON):\n\
         {specs_document}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_summary_ends_with_source_line() {
        let prompt = document_summary("body text", Some("https://a.example"));
        assert!(prompt.contains("Source: https://a.example"));
        assert!(prompt.ends_with("Document:\nbody text"));

        let prompt = document_summary("body text", None);
        assert!(prompt.contains("Source: unknown"));
    }

    #[test]
    fn test_render_spec_documents() {
        let docs = vec![
            ("https://a.example".to_string(), "spec a".to_string()),
            ("unknown".to_string(), "spec b".to_string()),
        ];
        assert_eq!(
            render_spec_documents(&docs),
            "URL: https://a.example\n\nspec a\n\n---\n\nURL: unknown\n\nspec b"
        );
    }

    #[test]
    fn test_render_summaries() {
        let summaries = vec![
            DocumentSummary::new(Some("https://a.example".to_string()), "first".to_string()),
            DocumentSummary::new(None, "second".to_string()),
        ];
        assert_eq!(
            render_summaries(&summaries),
            "From https://a.example:\nfirst\n\nFrom unknown:\nsecond"
        );
    }

    #[test]
    fn test_final_report_template_sections() {
        let prompt = final_report("porsche cayman 2007", "From x:\ny", NO_SPECS_FOUND);
        for section in [
            "Brand:",
            "Model:",
            "Year:",
            "Specifications:",
            "General Overview:",
            "Main Issues and Drawbacks:",
            "Main Positives:",
            "TLDR:",
            "Sources:",
        ] {
            assert!(prompt.contains(section), "missing section {}", section);
        }
        assert!(prompt.contains("summary of porsche cayman 2007 reviews"));
        assert!(prompt.ends_with("Extracted Specifications (JSON):\nNo specs found."));
    }

    #[test]
    fn test_spec_extraction_lists_fields() {
        let prompt = spec_extraction("URL: u\n\nbody");
        assert!(prompt.contains("\"source_url\""));
        assert!(prompt.contains("- engine_type_and_displacement\n"));
        assert!(prompt.ends_with("Documents:\nURL: u\n\nbody"));
    }
}
