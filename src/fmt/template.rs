//! Placeholder templates for file paths and rows.
//!
//! Rendering runs three passes over the string: `{SERVER.*}` tokens, then
//! `{BACKTRACE.*}` tokens, then the fixed tokens. Each pass re-parses the output
//! of the previous one, so a value injected by an earlier pass can still be
//! expanded by a later one, while values substituted in the fixed pass are
//! never rescanned.

use super::context::RenderContext;
use super::date::format_date;
use regex::Regex;
use std::sync::LazyLock;

/// Platform line terminator, substituted for `{EOL}` and appended after every row.
pub const EOL: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Namespaced tokens take priority; the namespace is case-insensitive, the key
/// is taken verbatim up to the first closing brace and may span lines.
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{(?<ns>(?i:SERVER|BACKTRACE))\.(?<key>.*?)\}|\{(?<name>[A-Z]+)\}")
        .expect("Invalid token regex")
});

static NAMESPACED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{(?<ns>(?i:SERVER|BACKTRACE))\.(?<key>.*?)\}")
        .expect("Invalid namespaced token regex")
});

/// The fixed pass ignores namespaces, so an unclosed `{SERVER.` cannot hide
/// the fixed tokens that follow it.
static FIXED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(?<name>[A-Z]+)\}").expect("Invalid fixed token regex"));

/// Fixed tokens, substituted from the render context in the final pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Day,
    Hour,
    Min,
    Date,
    Message,
    Title,
    Type,
    Status,
    Request,
    RawBody,
    Eol,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "YEAR",
            Self::Month => "MONTH",
            Self::Day => "DAY",
            Self::Hour => "HOUR",
            Self::Min => "MIN",
            Self::Date => "DATE",
            Self::Message => "MESSAGE",
            Self::Title => "TITLE",
            Self::Type => "TYPE",
            Self::Status => "STATUS",
            Self::Request => "REQUEST",
            Self::RawBody => "RAWBODY",
            Self::Eol => "EOL",
        }
    }

    pub const ALL: &'static [Self] = &[
        Self::Year,
        Self::Month,
        Self::Day,
        Self::Hour,
        Self::Min,
        Self::Date,
        Self::Message,
        Self::Title,
        Self::Type,
        Self::Status,
        Self::Request,
        Self::RawBody,
        Self::Eol,
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    fn resolve(self, ctx: &RenderContext<'_>) -> String {
        match self {
            Self::Year => ctx.now.format("%Y").to_string(),
            Self::Month => ctx.now.format("%m").to_string(),
            Self::Day => ctx.now.format("%d").to_string(),
            Self::Hour => ctx.now.format("%H").to_string(),
            Self::Min => ctx.now.format("%M").to_string(),
            Self::Date => format_date(&ctx.now, ctx.format_date),
            Self::Message => ctx.message.trim().to_string(),
            Self::Title => ctx.title.trim().to_string(),
            Self::Type => ctx.channel.to_string(),
            Self::Status => ctx.status.as_str().to_string(),
            Self::Request => serde_json::to_string_pretty(&ctx.request.params).unwrap_or_default(),
            Self::RawBody => ctx.request.raw_body.clone(),
            Self::Eol => EOL.to_string(),
        }
    }
}

/// Passes run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Server,
    Backtrace,
    Fixed,
}

impl TokenClass {
    pub const ORDER: [Self; 3] = [Self::Server, Self::Backtrace, Self::Fixed];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Field(Field),
    /// Key into the server environment map.
    Server(String),
    /// Key into the caller identity, matched lower-cased.
    Backtrace(String),
}

impl Token {
    #[must_use]
    pub const fn class(&self) -> TokenClass {
        match self {
            Self::Field(_) => TokenClass::Fixed,
            Self::Server(_) => TokenClass::Server,
            Self::Backtrace(_) => TokenClass::Backtrace,
        }
    }

    /// `None` leaves the token text in place.
    fn resolve(&self, ctx: &RenderContext<'_>) -> Option<String> {
        match self {
            Self::Field(field) => Some(field.resolve(ctx)),
            Self::Server(key) => ctx.request.server.get(key).cloned(),
            Self::Backtrace(key) => ctx.caller.and_then(|c| c.lookup(&key.to_lowercase())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// The raw text is kept so an unresolved token can be written back untouched.
    Token { token: Token, raw: String },
}

/// A template split into literal text and recognized tokens.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Recognizes every token kind at once.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        Self::scan(template, &TOKEN_REGEX)
    }

    /// Recognizes only the tokens one pass substitutes. Server and backtrace
    /// passes share a scan so neither can split the other's tokens.
    #[must_use]
    pub fn parse_for(template: &str, class: TokenClass) -> Self {
        match class {
            TokenClass::Server | TokenClass::Backtrace => Self::scan(template, &NAMESPACED_REGEX),
            TokenClass::Fixed => Self::scan(template, &FIXED_REGEX),
        }
    }

    fn scan(template: &str, regex: &Regex) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in regex.captures_iter(template) {
            let Some(whole) = caps.get(0) else {
                continue;
            };

            let token = if let (Some(ns), Some(key)) = (caps.name("ns"), caps.name("key")) {
                let key = key.as_str().to_string();
                if ns.as_str().eq_ignore_ascii_case("SERVER") {
                    Some(Token::Server(key))
                } else {
                    Some(Token::Backtrace(key))
                }
            } else {
                caps.name("name")
                    .and_then(|name| Field::from_name(name.as_str()))
                    .map(Token::Field)
            };

            // Unknown `{NAMES}` stay part of the surrounding literal.
            let Some(token) = token else {
                continue;
            };

            if whole.start() > last {
                segments.push(Segment::Literal(template[last..whole.start()].to_string()));
            }
            segments.push(Segment::Token {
                token,
                raw: whole.as_str().to_string(),
            });
            last = whole.end();
        }

        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_string()));
        }

        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Substitutes the tokens of one class; every other segment is copied as written.
    #[must_use]
    pub fn render_class(&self, class: TokenClass, ctx: &RenderContext<'_>) -> String {
        let mut result = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(s) => result.push_str(s),
                Segment::Token { token, raw } => {
                    let value = if token.class() == class {
                        token.resolve(ctx)
                    } else {
                        None
                    };
                    result.push_str(value.as_deref().unwrap_or(raw));
                }
            }
        }

        result
    }
}

/// Expands every token of `template` against `ctx`.
#[must_use]
pub fn render(template: &str, ctx: &RenderContext<'_>) -> String {
    let mut output = template.to_string();
    for class in TokenClass::ORDER {
        output = Template::parse_for(&output, class).render_class(class, ctx);
    }
    output
}
