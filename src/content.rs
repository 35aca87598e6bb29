//! Reference content: the call script and the objection table.
//!
//! A bundled dataset ships with the binary. A TOML file named in
//! `content.path` replaces it wholesale:
//!
//! ```toml
//! [[steps]]
//! id = "greeting"
//! title = "Greeting"
//! verbatim = "Thank you for calling..."
//! category = "opening"
//!
//! [[objections]]
//! id = "too-expensive"
//! objection = "It's too expensive."
//! solution = "Let's look at what you're using..."
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::objections::Objection;
use crate::session::{CallStep, Category};

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse content: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("content defines no call steps")]
    NoSteps,

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{kind} '{id}' has an empty {field}")]
    EmptyField {
        kind: &'static str,
        id: String,
        field: &'static str,
    },
}

/// Call script plus objection table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub steps: Vec<CallStep>,
    #[serde(default)]
    pub objections: Vec<Objection>,
}

impl Content {
    /// Content shipped with the binary
    pub fn bundled() -> Self {
        Self {
            steps: bundled_steps(),
            objections: bundled_objections(),
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ContentError> {
        let content: Content = toml::from_str(raw)?;
        content.validate()?;
        Ok(content)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load the configured content file, or the bundled set when none is configured
    pub fn load_configured(config: &Config) -> Result<Self, ContentError> {
        match config.content_path() {
            Some(path) => {
                let content = Self::load(&path)?;
                tracing::info!(
                    path = %path.display(),
                    steps = content.steps.len(),
                    objections = content.objections.len(),
                    "Loaded content file"
                );
                Ok(content)
            }
            None => Ok(Self::bundled()),
        }
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        if self.steps.is_empty() {
            return Err(ContentError::NoSteps);
        }

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(ContentError::DuplicateId {
                    kind: "step",
                    id: step.id.clone(),
                });
            }
            require("step", &step.id, "id", &step.id)?;
            require("step", &step.id, "title", &step.title)?;
            require("step", &step.id, "verbatim", &step.verbatim)?;
        }

        let mut seen = HashSet::new();
        for objection in &self.objections {
            if !seen.insert(objection.id.as_str()) {
                return Err(ContentError::DuplicateId {
                    kind: "objection",
                    id: objection.id.clone(),
                });
            }
            require("objection", &objection.id, "id", &objection.id)?;
            require("objection", &objection.id, "objection", &objection.objection)?;
            require("objection", &objection.id, "solution", &objection.solution)?;
        }

        Ok(())
    }
}

fn require(
    kind: &'static str,
    id: &str,
    field: &'static str,
    value: &str,
) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        return Err(ContentError::EmptyField {
            kind,
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}

fn bundled_steps() -> Vec<CallStep> {
    vec![
        CallStep::new(
            "greeting",
            "Greeting",
            "Thank you for calling [Xfinity] this is (your name) speaking. May I have the pleasure of knowing your first and last name?",
            Category::Opening,
        ),
        CallStep::new(
            "apology",
            "Apology",
            "I apologize for the inconvenience. I know what you must be feeling right now.",
            Category::Connection,
        ),
        CallStep::new(
            "empathy",
            "Empathy",
            "I feel what you must be feeling right now you know I've been through a very similar situation so I completely understand where you're coming from.",
            Category::Connection,
        ),
        CallStep::new(
            "assurance",
            "Assurance",
            "Thank you so much for explaining everything to me you came to the right department you're now with a specialist from the billing department and I'm not ending this call until all of your concerns are addressed.",
            Category::Connection,
        ),
        CallStep::new(
            "rephrasing",
            "Rephrasing",
            "To make sure that I understood everything correctly...",
            Category::Service,
        ),
        CallStep::new(
            "showing-value",
            "Showing Value",
            "You know I actually see accounts all day long and this package you've is not only an amazing package the price as well is one of a kind how did you get this price to begin with its amazing.",
            Category::Service,
        ),
        CallStep::new(
            "discovery",
            "Discovery",
            "What are your favorite channels that you always watch or like watching?",
            Category::Service,
        ),
        CallStep::new(
            "rapport",
            "Rapport",
            "Well actually while I'm working on this for you my mother's birthday is next week what would you recommend, I should get her?",
            Category::Service,
        ),
        CallStep::new(
            "appreciation",
            "Show Appreciation",
            "I see here from my end that you've been with Xfinity since ----, you've been a very loyal customer to Xfinity we really appreciate your business with us.",
            Category::Service,
        ),
        CallStep::new(
            "branding",
            "Branding Xfinity",
            "Xfinity would never be okay with something like this happening to you. You're a very loyal customer to Xfinity and we'll take good care of you.",
            Category::Service,
        ),
        CallStep::new(
            "recap",
            "Recap the Call",
            "So, as we're getting to an end let me make sure we covered everything, what we did so far is ...",
            Category::Closing,
        ),
        CallStep::new(
            "extra-assistance",
            "Extra Assistance",
            "I could send you an article or guide you through to make it easier for you. Is there anything else that I can help you with?",
            Category::Closing,
        ),
        CallStep::new(
            "satisfaction",
            "Satisfaction",
            "Can you confirm that this resolves your concerns for today? (pause for response) Great, I hope I was able to make you 100% satisfied with Xfinity. (pause for response) Thank you for being a loyal Xfinity Customer & I hope you have an amazing rest of your day",
            Category::Closing,
        ),
    ]
}

fn bundled_objections() -> Vec<Objection> {
    vec![
        Objection::new(
            "too-expensive",
            "My bill is too expensive.",
            "I completely understand, nobody likes a high bill. Let me review your account line by line so we only keep what you actually use, and check which promotions you qualify for today.",
        ),
        Objection::new(
            "price-increase",
            "Why did my price go up?",
            "I see the promotional rate on your account ended this cycle. Let me walk you through the change and see what current offers can bring that price back down for you.",
        ),
        Objection::new(
            "competitor-offer",
            "A competitor is offering me a better deal.",
            "I appreciate you telling me. Let's compare apples to apples: speed, channels, contract terms, and equipment fees. Most customers find our package gives more value once everything is on the table.",
        ),
        Objection::new(
            "want-to-cancel",
            "I want to cancel my service.",
            "I'm sorry to hear that, and I want to make sure we've done everything we can. May I ask what's prompting the cancellation so I can see if there's a way to fix it today?",
        ),
        Objection::new(
            "slow-internet",
            "My internet is always slow.",
            "That's frustrating, especially when you're paying for speed. Let me run a quick check on your connection and equipment. If your gateway is outdated I can get you an upgrade.",
        ),
        Objection::new(
            "dont-watch-tv",
            "I don't watch enough TV to pay for it.",
            "That makes sense. Let's look at a smaller TV tier or a streaming-friendly package so you're only paying for what you enjoy, while keeping your internet speed the same.",
        ),
        Objection::new(
            "no-time",
            "I don't have time for this right now.",
            "I respect your time. This will only take a couple of minutes, and I can also schedule a callback at a time that works better for you.",
        ),
        Objection::new(
            "think-about-it",
            "I need to think about it.",
            "Of course, it's an important decision. Let me recap the offer and note it on your account so it's held for you, and I'll send the details so you can review them at your convenience.",
        ),
    ]
}
