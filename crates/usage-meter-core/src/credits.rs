//! Credit calculation for messages.
//!
//! Each message is charged a number of credits derived from its text by a
//! fixed, ordered sequence of scoring rules. The rules are pure functions
//! folded left-to-right over a running total; only the final total is
//! rounded. When a message has an associated report, the report's credit
//! cost replaces the rule-derived amount entirely.

use std::collections::HashSet;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::Report;

/// Flat cost charged for every message.
const BASE_COST: Decimal = dec!(1.00);

/// Cost per character of the raw text, whitespace included.
const CHARACTER_COST: Decimal = dec!(0.05);

/// Cost per word of at most [`SHORT_WORD_MAX_CHARS`] characters.
const SHORT_WORD_COST: Decimal = dec!(0.10);

/// Cost per word of at most [`MEDIUM_WORD_MAX_CHARS`] characters.
const MEDIUM_WORD_COST: Decimal = dec!(0.20);

/// Cost per word longer than [`MEDIUM_WORD_MAX_CHARS`] characters.
const LONG_WORD_COST: Decimal = dec!(0.30);

const SHORT_WORD_MAX_CHARS: usize = 3;
const MEDIUM_WORD_MAX_CHARS: usize = 7;

/// Cost per vowel found at positions 2, 5, 8, … of the raw text.
const THIRD_VOWEL_COST: Decimal = dec!(0.30);

/// Flat penalty for texts longer than [`LENGTH_PENALTY_THRESHOLD`] characters.
const LENGTH_PENALTY: Decimal = dec!(5.00);

const LENGTH_PENALTY_THRESHOLD: usize = 100;

/// Discount applied when every scored word is distinct.
const UNIQUE_WORD_DISCOUNT: Decimal = dec!(2.00);

/// Floor applied to the running total after the uniqueness rule.
const MINIMUM_CREDITS: Decimal = dec!(1.00);

/// Multiplier applied to palindromic texts.
const PALINDROME_MULTIPLIER: Decimal = dec!(2.00);

/// A single scoring rule: takes the raw text and the running total,
/// returns the updated total.
type Rule = fn(&str, Decimal) -> Decimal;

/// The scoring rules in application order. Each rule consumes the total
/// produced by the previous one; reordering them changes the result
/// because the uniqueness floor and the palindrome multiplier are not
/// commutative with the additive rules.
const RULES: [Rule; 7] = [
    base_cost,
    character_cost,
    word_length_cost,
    third_vowel_cost,
    length_penalty,
    unique_word_bonus,
    palindrome_multiplier,
];

/// Calculate the credit cost of a message text.
///
/// Applies the seven scoring rules in order and rounds the result to
/// 2 decimal places, half-up. Total over all inputs: any UTF-8 text maps
/// to a cost, and identical texts always map to the same cost.
///
/// The result is never below 1.00; the empty text costs exactly 2.00
/// (the uniqueness rule floors it to 1.00 and the empty string counts
/// as a palindrome, doubling it).
#[must_use]
pub fn calculate(text: &str) -> Decimal {
    let total = RULES
        .iter()
        .fold(Decimal::ZERO, |credits, rule| rule(text, credits));
    round_credits(total)
}

/// Credit cost of a message whose report resolved.
///
/// The report's fixed cost, rounded to 2 decimal places half-up. The
/// message text plays no part in the result.
#[must_use]
pub fn calculate_with_report(report: &Report) -> Decimal {
    round_credits(report.credit_cost)
}

/// Round a credit amount to 2 decimal places, half-up.
fn round_credits(credits: Decimal) -> Decimal {
    credits.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Words that count towards the word-length and uniqueness rules:
/// whitespace-separated tokens containing at least one alphabetic
/// character. Purely numeric or punctuation tokens are skipped; mixed
/// tokens like "COVID-19" count at their full length.
fn scored_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|word| word.chars().any(char::is_alphabetic))
}

fn is_vowel(character: char) -> bool {
    matches!(
        character.to_ascii_lowercase(),
        'a' | 'e' | 'i' | 'o' | 'u'
    )
}

fn base_cost(_text: &str, credits: Decimal) -> Decimal {
    credits + BASE_COST
}

fn character_cost(text: &str, credits: Decimal) -> Decimal {
    credits + CHARACTER_COST * Decimal::from(text.chars().count())
}

fn word_length_cost(text: &str, credits: Decimal) -> Decimal {
    scored_words(text).fold(credits, |credits, word| {
        let length = word.chars().count();
        let cost = if length <= SHORT_WORD_MAX_CHARS {
            SHORT_WORD_COST
        } else if length <= MEDIUM_WORD_MAX_CHARS {
            MEDIUM_WORD_COST
        } else {
            LONG_WORD_COST
        };
        credits + cost
    })
}

fn third_vowel_cost(text: &str, credits: Decimal) -> Decimal {
    let vowels = text
        .chars()
        .skip(2)
        .step_by(3)
        .filter(|&character| is_vowel(character))
        .count();
    credits + THIRD_VOWEL_COST * Decimal::from(vowels)
}

fn length_penalty(text: &str, credits: Decimal) -> Decimal {
    if text.chars().count() > LENGTH_PENALTY_THRESHOLD {
        credits + LENGTH_PENALTY
    } else {
        credits
    }
}

/// The discount applies when the scored word count equals the distinct
/// scored word count (case-sensitive); the floor applies either way.
fn unique_word_bonus(text: &str, credits: Decimal) -> Decimal {
    let words: Vec<&str> = scored_words(text).collect();
    let distinct: HashSet<&str> = words.iter().copied().collect();

    let credits = if words.len() == distinct.len() {
        credits - UNIQUE_WORD_DISCOUNT
    } else {
        credits
    };

    credits.max(MINIMUM_CREDITS)
}

/// Doubles the total when the text, stripped of non-alphanumeric
/// characters and lowercased, reads the same in both directions. The
/// empty string counts as a palindrome.
fn palindrome_multiplier(text: &str, credits: Decimal) -> Decimal {
    let normalized: String = text
        .chars()
        .filter(|character| character.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    if normalized.chars().eq(normalized.chars().rev()) {
        credits * PALINDROME_MULTIPLIER
    } else {
        credits
    }
}
