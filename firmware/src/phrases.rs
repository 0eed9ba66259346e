//! Phrase table flashed into the input node

use morselink_core::StaticPhraseTable;

pub static PHRASES: StaticPhraseTable<'static> = StaticPhraseTable::new(&[
    (".-", "Yes"),
    ("-.", "No"),
    ("..", "Hello"),
    ("--", "Thank you"),
    ("...", "I need water"),
    ("---", "I am in pain"),
    (".-.", "Please call the nurse"),
    ("-.-", "I am tired"),
    ("..-", "I am hungry"),
    ("--.", "I am cold"),
    (".--", "I am hot"),
]);
