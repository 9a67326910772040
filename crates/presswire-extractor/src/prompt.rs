//! Instruction text sent to the collaborator at each stage
//!
//! Metadata extraction is driven by [`METADATA_SCHEMAS`]: one descriptor per
//! content type, rendered through a single template. Adding a content type
//! means adding a row, not a new prompt.

use presswire_domain::{Classification, ContentType, Metadata};
use serde_json::{json, Map, Value};

/// Example value for one `key_stats` entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatExample {
    /// A single text value
    Text(&'static str),
    /// A list of text values
    List(&'static str),
}

impl StatExample {
    fn to_value(self) -> Value {
        match self {
            StatExample::Text(hint) => json!(hint),
            StatExample::List(hint) => json!([hint]),
        }
    }
}

/// What to ask for when extracting metadata for one content type
#[derive(Debug, Clone, Copy)]
pub struct SchemaDescriptor {
    /// Content type this row applies to
    pub content_type: ContentType,
    /// Opening line of the format section
    pub lead: &'static str,
    /// Hint shown for `teams`
    pub teams: &'static str,
    /// Hint shown for `players`
    pub players: &'static str,
    /// Hint shown for `competition`
    pub competition: &'static str,
    /// Hint shown for `sentiment`
    pub sentiment: &'static str,
    /// Example shape of `key_stats`
    pub key_stats: &'static [(&'static str, StatExample)],
}

/// Outer keys every metadata reply is asked for
pub const METADATA_KEYS: [&str; 5] = ["teams", "players", "competition", "sentiment", "key_stats"];

const STRUCTURED_LEAD: &str = "Return the following fields as JSON:";

/// Extraction schema for every content type, in [`ContentType::ALL`] order
pub const METADATA_SCHEMAS: [SchemaDescriptor; 5] = [
    SchemaDescriptor {
        content_type: ContentType::MatchReport,
        lead: STRUCTURED_LEAD,
        teams: "Both teams",
        players: "Players mentioned",
        competition: "League or tournament",
        sentiment: "positive/negative/neutral",
        key_stats: &[
            ("score", StatExample::Text("2-1")),
            ("goalscorers", StatExample::List("Players who scored")),
            ("attendance", StatExample::Text("75,000")),
            ("other_notable_stats", StatExample::List("Other important figures")),
        ],
    },
    SchemaDescriptor {
        content_type: ContentType::TransferNews,
        lead: STRUCTURED_LEAD,
        teams: "Clubs involved in the deal",
        players: "Player(s) moving",
        competition: "League context, if mentioned",
        sentiment: "positive/negative/neutral",
        key_stats: &[
            ("transfer_fee", StatExample::Text("£50 million or unknown")),
            ("contract_length", StatExample::Text("5 years or unknown")),
            ("previous_club", StatExample::Text("Club name")),
            ("new_club", StatExample::Text("Club name")),
        ],
    },
    SchemaDescriptor {
        content_type: ContentType::InjuryUpdate,
        lead: STRUCTURED_LEAD,
        teams: "Team the player plays for",
        players: "Injured player(s)",
        competition: "League or tournament context",
        sentiment: "usually negative",
        key_stats: &[
            ("injury_type", StatExample::Text("hamstring/ACL/etc or unknown")),
            ("expected_absence", StatExample::Text("6 weeks or unknown")),
            ("matches_to_miss", StatExample::Text("number or unknown")),
            ("injury_severity", StatExample::Text("minor/moderate/severe")),
        ],
    },
    SchemaDescriptor {
        content_type: ContentType::OpinionPiece,
        lead: STRUCTURED_LEAD,
        teams: "Teams discussed",
        players: "Players discussed",
        competition: "League or tournament context",
        sentiment: "positive/negative/neutral, the author's overall stance",
        key_stats: &[
            ("author_stance", StatExample::Text("Short description of the opinion")),
            ("main_arguments", StatExample::List("Key points made")),
            ("statistics_cited", StatExample::List("Figures quoted by the author")),
        ],
    },
    SchemaDescriptor {
        content_type: ContentType::Other,
        lead: "Return whatever metadata is relevant as JSON:",
        teams: "Any teams mentioned",
        players: "Any players mentioned",
        competition: "League or tournament, if mentioned",
        sentiment: "positive/negative/neutral",
        key_stats: &[("summary", StatExample::Text("What this content is about"))],
    },
];

/// Look up the extraction schema for a content type
pub fn schema_for(content_type: ContentType) -> &'static SchemaDescriptor {
    let index = ContentType::ALL
        .iter()
        .position(|t| *t == content_type)
        .unwrap_or(ContentType::ALL.len() - 1);
    &METADATA_SCHEMAS[index]
}

impl SchemaDescriptor {
    /// Example reply shape shown to the collaborator
    pub fn example(&self) -> Value {
        let key_stats: Map<String, Value> = self
            .key_stats
            .iter()
            .map(|(key, example)| (key.to_string(), example.to_value()))
            .collect();

        json!({
            "teams": [self.teams],
            "players": [self.players],
            "competition": self.competition,
            "sentiment": self.sentiment,
            "key_stats": key_stats,
        })
    }
}

const CLASSIFY_EXAMPLES: [(&str, ContentType); 4] = [
    ("Manchester United defeated Liverpool 2-1 at Old Trafford...", ContentType::MatchReport),
    ("Chelsea have signed striker John Doe for £50m...", ContentType::TransferNews),
    ("Star player ruled out for 6 weeks with hamstring injury...", ContentType::InjuryUpdate),
    ("Why Manchester United's tactics are failing this season...", ContentType::OpinionPiece),
];

const HEADLINE_GUIDELINES: &str = "\
GUIDELINES:
- neutral: facts, scores and key events for general sports news sites. Formal, no emotion. 8-12 words.
- fan_oriented: written for supporters. Nicknames and emotion are welcome. 6-10 words.
- casual_viewer: for readers who don't follow closely. Say why it matters (rivalry, title race, playoff push). 10-15 words.";

const HEADLINE_EXAMPLE: &str = r#"Example for a Manchester United win:
{
  "neutral": "Manchester United defeat Liverpool 2-1 at Old Trafford",
  "fan_oriented": "Red Devils sink Liverpool with late winner!",
  "casual_viewer": "Manchester United beat historic rivals Liverpool 2-1 in crucial Premier League match"
}"#;

/// Builds the instructions for each stage from one article
pub struct PromptBuilder<'a> {
    text: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder for the article text
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Classification instructions: categories, the article, reply format, examples
    pub fn classification(&self) -> String {
        let mut prompt = String::from(
            "You are a sports content classifier. Read the content below and assign it to exactly ONE of these categories:\n\n",
        );
        for (i, content_type) in ContentType::ALL.iter().enumerate() {
            prompt.push_str(&format!("{}. {} - {}\n", i + 1, content_type, content_type.definition()));
        }

        self.push_content(&mut prompt, self.text);

        prompt.push_str("Reply with JSON in exactly this structure:\n");
        prompt.push_str(
            "{\n  \"content_type\": \"one of the 5 categories above\",\n  \"confidence\": 0.95,\n  \"reasoning\": \"Short explanation of the choice\"\n}\n\n",
        );

        prompt.push_str("Examples:\n");
        for (snippet, content_type) in CLASSIFY_EXAMPLES {
            prompt.push_str(&format!("- \"{}\" -> {}\n", snippet, content_type));
        }
        prompt.push_str("\nNow classify the content above.");
        prompt
    }

    /// Extraction instructions for the schema of `content_type`
    pub fn extraction(&self, content_type: ContentType) -> String {
        let schema = schema_for(content_type);
        let example = serde_json::to_string_pretty(&schema.example()).unwrap_or_default();

        let mut prompt = String::from("Extract structured metadata from this sports content.\n");
        self.push_content(&mut prompt, self.text);
        prompt.push_str(schema.lead);
        prompt.push('\n');
        prompt.push_str(&example);
        prompt.push_str("\n\nIf a field is not present in the content, use null or an empty list as appropriate.");
        prompt
    }

    /// Headline instructions built from the earlier stages' outputs
    pub fn generation(
        &self,
        classification: &Classification,
        metadata: &Metadata,
        excerpt_chars: usize,
        players_limit: usize,
    ) -> String {
        let players: Vec<&str> = metadata
            .players
            .iter()
            .take(players_limit)
            .map(String::as_str)
            .collect();

        let mut prompt = String::from(
            "You are a sports headline writer. Write THREE versions of a headline for this content.\n\nCONTEXT:\n",
        );
        prompt.push_str(&format!(
            "Content type: {} (confidence {:.2})\n",
            classification.content_type, classification.confidence
        ));
        prompt.push_str(&format!("Teams involved: {}\n", or_na(&metadata.teams.join(", "))));
        prompt.push_str(&format!("Key players: {}\n", or_na(&players.join(", "))));
        prompt.push_str(&format!(
            "Competition: {}\n",
            or_na(metadata.competition.as_deref().unwrap_or_default())
        ));
        prompt.push_str(&format!("Sentiment: {}\n", metadata.sentiment));

        let excerpt = excerpt(self.text, excerpt_chars);
        self.push_content(&mut prompt, &excerpt);

        prompt.push_str("Reply with JSON containing the keys \"neutral\", \"fan_oriented\" and \"casual_viewer\".\n\n");
        prompt.push_str(HEADLINE_GUIDELINES);
        prompt.push_str("\n\n");
        prompt.push_str(HEADLINE_EXAMPLE);
        prompt.push_str("\n\nNow write headlines for the content above.");
        prompt
    }

    fn push_content(&self, prompt: &mut String, text: &str) {
        prompt.push_str("\n<content>\n");
        prompt.push_str(text);
        prompt.push_str("\n</content>\n\n");
    }
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// First `max_chars` characters of `text`, marked when cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
