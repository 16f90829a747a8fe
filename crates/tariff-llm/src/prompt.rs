//! LLM prompt for ruling field extraction

use tariff_domain::Field;

/// System message sent with every extraction request
pub const SYSTEM_PROMPT: &str =
    "You extract structured fields from customs ruling letters. Output JSON only.";

/// Builds the user prompt for one ruling letter
pub struct PromptBuilder<'a> {
    text: &'a str,
    ruling_id: Option<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder over the letter text
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            ruling_id: None,
        }
    }

    /// Tell the model which ruling it is reading
    pub fn with_ruling_id(mut self, ruling_id: &'a str) -> Self {
        self.ruling_id = Some(ruling_id);
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();

        let mut prompt = String::new();
        prompt.push_str(
            "You will be given the full text of a CBP customs classification ruling letter. \
             Return ONLY valid JSON with EXACTLY these keys:\n",
        );
        prompt.push_str(&keys.join(", "));
        prompt.push_str(".\n\nUse null when unknown. Do not add extra keys. No commentary.\n\n");

        prompt.push_str("DATA DICTIONARY DEFINITIONS (use these strictly):\n");
        for field in Field::ALL {
            prompt.push_str(&format!("- {}: {}\n", field.key(), definition(field)));
        }

        prompt.push('\n');
        prompt.push_str(OUTPUT_RULES);

        if let Some(id) = self.ruling_id {
            prompt.push_str(&format!("\nRULING ID: {}\n", id));
        }

        prompt.push_str("\nTEXT:\n");
        prompt.push_str(self.text);
        prompt
    }
}

fn definition(field: Field) -> &'static str {
    match field {
        Field::RulingId => "The ruling control number like N340865.",
        Field::SubmittingFirm => {
            "The firm/company submitting the request, often a law firm."
        }
        Field::Submitter => "The person submitting the request, e.g., \"Ms. Kristina Barry\".",
        Field::Importer => "The client/on-behalf-of entity, e.g., \"Toby Company\".",
        Field::DateSubmitted => "The date in \"In your letter dated Month DD, YYYY ...\".",
        Field::DateReplied => {
            "Reply date near top (before \"Dear ...\"), format \"Month DD, YYYY\"."
        }
        Field::ReplyingPerson => {
            "Signature lines after \"Sincerely,\". Use \"<br>\" between lines."
        }
        Field::CaseHandler => "National Import Specialist name only (no email).",
        Field::HtsSuggestion => "Requester's proposed HTS code.",
        Field::HtsDecision => "CBP final HTS code.",
        Field::DutyRate => "After \"The rate of duty will be ...\".",
        Field::ProductDescription => {
            "Paragraph starting \"The sample,\" describing merchandise."
        }
    }
}

const OUTPUT_RULES: &str = "OUTPUT RULES:
- dates must be \"Month DD, YYYY\" (not ISO).
- HTS codes must look like ####.##.#### when present.
- Do not invent values; only extract from given text.
";
