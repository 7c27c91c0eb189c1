use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Built-in response text used when the world description leaves a key out.
const DEFAULT_RESPONSES: &[(&str, &str)] = &[
    ("start", "Welcome, adventurer."),
    ("unknown_command", "I don't understand \"{0}\"."),
    ("unknown_command_suggest", "I don't understand \"{0}\". Did you mean \"{1}\"?"),
    ("request_argument", "What do you want to {0}?"),
    ("nothing_happens", "Nothing happens."),
    ("game_over", "The game is over."),
    ("reject_unknown_item", "I don't know what \"{0}\" is."),
    ("reject_not_holding", "You are not holding the {0}."),
    ("reject_carrying", "You are already carrying the {0}."),
    ("reject_not_here", "There is no {0} here."),
    ("reject_no_direction", "You can't go that way."),
    ("reject_obstruction", "The {0} blocks your way."),
    ("reject_teleport", "Nothing happens."),
    ("reject_too_dark", "It is too dark to see."),
    ("reject_switch_vocabulary", "You can switch the {0} \"{1}\" or \"{2}\"."),
    ("reject_not_switchable", "The {0} cannot be switched."),
    ("reject_already_switched", "The {0} is already {1}."),
    ("confirm_switched", "The {0} is now {1}."),
    ("confirm_player_switched", "{0} is now {1}."),
    ("reject_owned", "The {1} will not let you take the {0}."),
    ("reject_not_portable", "You cannot take the {0}."),
    ("reject_liquid", "The {0} runs through your fingers."),
    ("reject_too_heavy", "The {0} is too heavy to carry with everything else."),
    ("confirm_taken", "Taken."),
    ("confirm_dropped", "Dropped."),
    ("confirm_poured", "The {0} pours away."),
    ("reject_not_container", "The {0} cannot hold anything."),
    ("reject_container_full", "The {0} already holds the {1}."),
    ("reject_wrong_contents", "The {0} cannot hold the {1}."),
    ("reject_too_big", "The {0} does not fit in the {1}."),
    ("reject_insert_self", "You cannot put the {0} inside itself."),
    ("confirm_inserted", "You put the {0} into the {1}."),
    ("reject_not_wearable", "You cannot wear the {0}."),
    ("reject_already_worn", "You are already wearing the {0}."),
    ("confirm_worn", "You are now wearing the {0}."),
    ("reject_not_worn", "You are not wearing the {0}."),
    ("confirm_removed", "You take off the {0}."),
    ("reject_not_consumable", "You cannot consume the {0}."),
    ("confirm_consumed", "You consume the {0}."),
    ("reject_not_liquid", "You cannot pour the {0}."),
    ("reject_no_writing", "There is nothing written on the {0}."),
    ("describe_writing", "It reads: \"{0}\""),
    ("describe_dark", "It is pitch dark."),
    ("describe_item_here", "There is {0} here."),
    ("describe_exits", "Exits: {0}."),
    ("describe_contents", "The {0} contains {1}."),
    ("describe_topics", "You can ask about: {0}."),
    ("inventory_empty", "You are not carrying anything."),
    ("inventory_list", "You are carrying:\n{0}"),
    ("describe_score", "You have scored {0} points in {1} moves."),
    ("describe_help", "Type a verb and what to use it on, such as \"take lamp\" or \"north\". Type \"commands\" to list the verbs."),
    ("describe_commands", "I know these verbs: {0}."),
    ("reject_no_hint", "There is no hint about \"{0}\"."),
    ("reject_no_explanation", "There is no explanation of \"{0}\"."),
    ("confirm_quit", "You scored {0} points in {1} moves. Goodbye."),
    ("death_darkness", "You stumble around in the dark and fall into a pit. You are dead."),
    ("death_drowning", "You cannot breathe here. You drown."),
    ("death_generic", "You are dead."),
    ("reincarnation_prompt", "Do you want to be reincarnated?"),
    ("reincarnation_yes", "You are reincarnated."),
    ("reincarnation_no", "Rest in peace."),
    ("reincarnation_unclear", "Please answer yes or no."),
];

/// Response templates keyed by name, with built-in fallbacks.
#[derive(Debug, Clone, Default)]
pub struct Responses {
    entries: HashMap<String, String>,
}

impl Responses {
    /// Empty table; every key falls back to the built-in text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a template. Templates use `{N}` placeholders.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// The template for `key`. Unknown keys render as the key itself.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.entries
            .get(key)
            .map(String::as_str)
            .or_else(|| {
                DEFAULT_RESPONSES
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| *v)
            })
            .unwrap_or(key)
    }

    /// Format the template for `key` with `content`.
    pub fn format(&self, key: &str, content: &[String]) -> String {
        format_template(self.get(key), content)
    }

    /// Number of templates supplied by the world description.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the world description supplied no templates.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Named word sets the token processor understands.
#[derive(Debug, Clone)]
pub struct InputVocabulary {
    words: BTreeMap<String, BTreeSet<String>>,
}

impl Default for InputVocabulary {
    fn default() -> Self {
        let mut vocabulary = Self {
            words: BTreeMap::new(),
        };
        vocabulary.extend("yes", ["y", "yes"]);
        vocabulary.extend("no", ["n", "no"]);
        vocabulary.extend("filler", ["the", "a", "an"]);
        vocabulary
    }
}

impl InputVocabulary {
    /// Vocabulary key for affirmative answers.
    pub const YES: &'static str = "yes";
    /// Vocabulary key for negative answers.
    pub const NO: &'static str = "no";
    /// Vocabulary key for words the tokenizer drops.
    pub const FILLER: &'static str = "filler";

    /// Replace the word set for `name`.
    pub fn set<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.insert(
            name.to_lowercase(),
            words.into_iter().map(|w| w.as_ref().to_lowercase()).collect(),
        );
    }

    /// Add words to the set for `name`.
    pub fn extend<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words
            .entry(name.to_lowercase())
            .or_default()
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
    }

    /// Whether `word` belongs to the set `name`.
    pub fn is(&self, name: &str, word: &str) -> bool {
        self.words
            .get(name)
            .is_some_and(|set| set.contains(&word.to_lowercase()))
    }
}

/// All text loaded alongside the entity graph.
#[derive(Debug, Clone, Default)]
pub struct TextTables {
    /// Response templates.
    pub responses: Responses,
    /// Hints by topic.
    pub hints: BTreeMap<String, String>,
    /// Explanations by topic.
    pub explanations: BTreeMap<String, String>,
    /// Input word sets.
    pub inputs: InputVocabulary,
}

/// Replace `{N}` placeholders with `content[N]`.
///
/// Placeholders without a matching value are left untouched so a missing
/// argument shows up in play instead of silently vanishing.
pub fn format_template(template: &str, content: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.chars().take_while(char::is_ascii_digit).count();
        let closes = digits > 0 && after[digits..].starts_with('}');
        let value = closes
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|index| content.get(index));
        match value {
            Some(value) => {
                out.push_str(value);
                rest = &after[digits + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Convert the `$N` placeholders used in world descriptions into `{N}`.
pub fn translate_positional(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' && chars.peek().is_some_and(char::is_ascii_digit) {
            out.push('{');
            while let Some(d) = chars.next_if(char::is_ascii_digit) {
                out.push(d);
            }
            out.push('}');
        } else {
            out.push(c);
        }
    }
    out
}
