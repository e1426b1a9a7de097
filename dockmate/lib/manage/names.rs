use rand::Rng;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

const ADJECTIVES: &[&str] = &[
    "admiring", "agitated", "amazing", "angry", "awesome", "blissful", "bold", "brave", "busy",
    "charming", "clever", "cool", "compassionate", "confident", "cranky", "dazzling", "determined",
    "distracted", "dreamy", "eager", "ecstatic", "elastic", "elated", "elegant", "epic", "fervent",
    "festive", "flamboyant", "focused", "friendly", "frosty", "gallant", "gifted", "goofy",
    "gracious", "happy", "hardcore", "heuristic", "hopeful", "hungry", "infallible", "inspiring",
    "jolly", "jovial", "keen", "kind", "laughing", "loving", "lucid", "magical", "modest",
    "musing", "mystifying", "naughty", "nervous", "nifty", "nostalgic", "objective", "optimistic",
    "peaceful", "pedantic", "pensive", "practical", "priceless", "quirky", "quizzical", "relaxed",
    "reverent", "romantic", "sad", "serene", "sharp", "silly", "sleepy", "stoic", "strange",
    "stupefied", "suspicious", "sweet", "tender", "thirsty", "trusting", "unruffled", "upbeat",
    "vibrant", "vigilant", "vigorous", "wizardly", "wonderful", "xenodochial", "youthful",
    "zealous", "zen",
];

const NOUNS: &[&str] = &[
    "albattani", "archimedes", "babbage", "banach", "bardeen", "bell", "bhabha", "bohr", "boole",
    "borg", "brahmagupta", "cannon", "carson", "cerf", "chandrasekhar", "curie", "darwin",
    "dijkstra", "dirac", "einstein", "euclid", "euler", "faraday", "fermat", "fermi", "feynman",
    "franklin", "galileo", "gauss", "goldberg", "goodall", "hamilton", "hawking", "heisenberg",
    "hertz", "hodgkin", "hopper", "hypatia", "jackson", "jang", "johnson", "kalam", "kepler",
    "knuth", "kowalevski", "lamarr", "lamport", "leakey", "lovelace", "lumiere", "margulis",
    "maxwell", "mccarthy", "meitner", "mendel", "merkle", "morse", "newton", "nobel", "noether",
    "pascal", "pasteur", "payne", "perlman", "pike", "poincare", "ptolemy", "raman", "ride",
    "ritchie", "rosalind", "sammet", "shannon", "shockley", "sinoussi", "stonebraker", "swartz",
    "tesla", "thompson", "torvalds", "turing", "varahamihira", "volhard", "wescoff", "williams",
    "wilson", "wozniak", "wright", "yalow", "yonath",
];

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns a random, human readable `adjective_noun` name.
pub fn random_name() -> String {
    let mut rng = rand::thread_rng();
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];

    format!("{}_{}", adjective, noun)
}

/// Returns a random name to park a container under while it is being replaced.
///
/// The name never equals `current`.
pub fn temporary_name(current: &str) -> String {
    loop {
        let name = random_name();
        if name != current {
            return name;
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_name_has_two_words() {
        for _ in 0..100 {
            let name = random_name();
            let (adjective, noun) = name.split_once('_').unwrap();
            assert!(ADJECTIVES.contains(&adjective));
            assert!(NOUNS.contains(&noun));
        }
    }

    #[test]
    fn test_temporary_name_differs_from_current() {
        let name = temporary_name("svc");
        assert_ne!(name, "svc");
        assert!(name.contains('_'));
    }
}
