//! Splitting a line of input into tokens.

use lantern_core::InputVocabulary;

/// Lowercase `line`, split it on whitespace, and drop filler words.
pub fn tokenize(line: &str, inputs: &InputVocabulary) -> Vec<String> {
    line.split_whitespace()
        .map(str::to_lowercase)
        .filter(|word| !inputs.is(InputVocabulary::FILLER, word))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_splits() {
        let inputs = InputVocabulary::default();
        assert_eq!(tokenize("  Take   LAMP ", &inputs), vec!["take", "lamp"]);
    }

    #[test]
    fn drops_filler_words() {
        let inputs = InputVocabulary::default();
        assert_eq!(
            tokenize("put the bottle into a cage", &inputs),
            vec!["put", "bottle", "into", "cage"]
        );
    }

    #[test]
    fn custom_filler() {
        let mut inputs = InputVocabulary::default();
        inputs.set(InputVocabulary::FILLER, ["please"]);
        assert_eq!(tokenize("please take the lamp", &inputs), vec!["take", "the", "lamp"]);
    }

    #[test]
    fn empty_input() {
        assert!(tokenize("   ", &InputVocabulary::default()).is_empty());
    }
}
