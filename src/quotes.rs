use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const fn quote(text: &'static str, author: &'static str) -> Quote {
    Quote { text, author }
}

pub const QUOTES: [Quote; 20] = [
    quote("The only way to do great work is to love what you do.", "Steve Jobs"),
    quote("It always seems impossible until it is done.", "Nelson Mandela"),
    quote("Don't watch the clock; do what it does. Keep going.", "Sam Levenson"),
    quote(
        "Success is not final, failure is not fatal: It is the courage to continue that counts.",
        "Winston Churchill",
    ),
    quote("Believe you can and you're halfway there.", "Theodore Roosevelt"),
    quote(
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
    ),
    quote("You are never too old to set another goal or to dream a new dream.", "C.S. Lewis"),
    quote("Quality is not an act, it is a habit.", "Aristotle"),
    quote("Your time is limited, so don't waste it living someone else's life.", "Steve Jobs"),
    quote("Whatever the mind of man can conceive and believe, it can achieve.", "Napoleon Hill"),
    quote("Strive not to be a success, but rather to be of value.", "Albert Einstein"),
    quote("I attribute my success to this: I never gave or took any excuse.", "Florence Nightingale"),
    quote("You miss 100% of the shots you don't take.", "Wayne Gretzky"),
    quote("Definiteness of purpose is the starting point of all achievement.", "W. Clement Stone"),
    quote("Life is what happens to you while you're busy making other plans.", "John Lennon"),
    quote("We become what we think about.", "Earl Nightingale"),
    quote(
        "Twenty years from now you will be more disappointed by the things that you didn't do than by the ones you did do.",
        "Mark Twain",
    ),
    quote("Life is 10% what happens to me and 90% of how I react to it.", "Charles Swindoll"),
    quote(
        "The most common way people give up their power is by thinking they don't have any.",
        "Alice Walker",
    ),
    quote("The mind is everything. What you think you become.", "Buddha"),
];

pub fn random_quote() -> Quote {
    *QUOTES.choose(&mut rand::thread_rng()).unwrap_or(&QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_quote_comes_from_the_list() {
        for _ in 0..20 {
            assert!(QUOTES.contains(&random_quote()));
        }
    }

    #[test]
    fn every_quote_has_an_author() {
        assert!(QUOTES.iter().all(|q| !q.text.is_empty() && !q.author.is_empty()));
    }
}
