use serde::Serialize;

pub const INTRO_GREETING: &[&str] = &[
    "Hello, there! My name is Beethoven, I'm a pianist and I'll guide you through this interactive journey.",
    "Are you ready?",
];

/// Message of [`INTRO_GREETING`] after which the accept button appears.
pub const INTRO_PROMPT_AT: usize = 1;

pub const INTRO_WELCOME: &[&str] = &[
    "I'm flattered to meet you.",
    "Please, come with me to my music studio and I'll show you more.",
    "Welcome to my studio.",
    "This is a piano! It has white keys and black keys, flats and sharps.",
    "Ahhh. I see you have found the most marvelous instrument of them all.",
    "Each key is a doorway to endless melodies.",
    "With those keys, you can express joy, sorrow, passion...",
    "Go on. Press a key.",
    "Listen closely - music is all around you.",
    "Feel free to explore the piano. After, I'll teach you a very special song to me!",
];

pub const TUTORIAL_INTRO: &[&str] = &[
    "Let's try to play a song.",
    "This is a song I wrote in 1810, called *For Elise*.",
    "I'll highlight the keys you need to play.",
];

pub const TUTORIAL_RETRY: &[&str] = &[
    "Wow. You are getting better at this.",
    "We should practice this song a little bit more.",
    "Alright, let's practice one more time!",
];

pub const GATE_PASSED: &[&str] = &[
    "Wow! You're such a great pianist.",
    "I think you are ready to perform this song.",
    "Let's go to the Steve Jobs Theater, and perform this song to the world!",
    "Do you feel ready?",
];

pub const GATE_READY: &[&str] = &["Great! Let's head to the Theater!"];

pub const GATE_PRACTICE: &[&str] = &["Alright, let's practice one more time!"];

pub const PERFORMANCE_INTRO: &[&str] = &[
    "Welcome to the Steve Jobs Theater.",
    "Ah... This grand hall. Created in honor of a man who dared to change the world.",
    "Innovation. Art. Passion.",
    "This theater stands for a man who, much like the composers of old, crafted something timeless.",
    "And tonight you add your name to this history too!",
    "Our friend Steve once said: 'The people who are crazy enough to think they can change the world are the ones who do.'",
    "And music is no different, my friend.",
    "Take a deep breath.",
    "Feel the weight of history in your fingers...",
    "Now, let the music flow.",
];

pub const PERFORMANCE_FADING: &[&str] = &[
    "Whoa! That's strange.",
    "We must be tired. But don't stop playing.",
    "I'll ask haptic feedback to help you!",
    "We're in this together.",
];

pub const PERFORMANCE_OUTRO: &[&str] = &["Well done, my friend! We got it!"];

pub const CLOSING: &[&str] = &[
    "You just experienced a glimpse of what Beethoven did!",
    "Becoming deaf didn't stop him from doing what he loved!",
    "Music has no limits, no barriers.",
    "It is not only to be heard, but also to be lived and felt!",
    "Even today, many deaf musicians continue to create music that touches the world.",
];

#[derive(Serialize, Clone, Debug)]
pub struct ScriptEntry {
    pub name: &'static str,
    pub messages: &'static [&'static str],
}

/// Every narration line in play order, for hosts that preload text layout.
pub fn all_scripts() -> Vec<ScriptEntry> {
    [
        ("intro_greeting", INTRO_GREETING),
        ("intro_welcome", INTRO_WELCOME),
        ("tutorial_intro", TUTORIAL_INTRO),
        ("tutorial_retry", TUTORIAL_RETRY),
        ("gate_passed", GATE_PASSED),
        ("gate_ready", GATE_READY),
        ("gate_practice", GATE_PRACTICE),
        ("performance_intro", PERFORMANCE_INTRO),
        ("performance_fading", PERFORMANCE_FADING),
        ("performance_outro", PERFORMANCE_OUTRO),
        ("closing", CLOSING),
    ]
    .into_iter()
    .map(|(name, messages)| ScriptEntry { name, messages })
    .collect()
}
