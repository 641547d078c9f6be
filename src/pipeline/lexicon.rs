//! Compiled-in English polarity lexicon.
//!
//! Values are in `[-1, 1]`. The list is biased toward vocabulary that shows
//! up in annual and sustainability reports rather than product reviews.

pub const POLARITY: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("outstanding", 1.0),
    ("exceptional", 0.9),
    ("best", 1.0),
    ("better", 0.5),
    ("positive", 0.6),
    ("strong", 0.5),
    ("stronger", 0.5),
    ("robust", 0.5),
    ("solid", 0.4),
    ("healthy", 0.5),
    ("successful", 0.7),
    ("success", 0.7),
    ("succeed", 0.6),
    ("achieve", 0.5),
    ("achieved", 0.5),
    ("achievement", 0.6),
    ("growth", 0.5),
    ("grow", 0.4),
    ("grew", 0.4),
    ("growing", 0.4),
    ("increase", 0.3),
    ("increased", 0.3),
    ("improve", 0.5),
    ("improved", 0.5),
    ("improvement", 0.5),
    ("gain", 0.4),
    ("gains", 0.4),
    ("profit", 0.5),
    ("profitable", 0.6),
    ("profitability", 0.5),
    ("benefit", 0.5),
    ("beneficial", 0.6),
    ("opportunity", 0.5),
    ("opportunities", 0.5),
    ("innovative", 0.6),
    ("innovation", 0.5),
    ("efficient", 0.5),
    ("efficiency", 0.4),
    ("sustainable", 0.4),
    ("stable", 0.3),
    ("stability", 0.3),
    ("leading", 0.4),
    ("leader", 0.4),
    ("record", 0.3),
    ("happy", 0.8),
    ("pleased", 0.7),
    ("proud", 0.7),
    ("satisfied", 0.6),
    ("satisfaction", 0.6),
    ("confident", 0.6),
    ("confidence", 0.5),
    ("trust", 0.5),
    ("valuable", 0.6),
    ("value", 0.3),
    ("effective", 0.5),
    ("effectively", 0.5),
    ("significant", 0.3),
    ("important", 0.4),
    ("quality", 0.4),
    ("reliable", 0.5),
    ("secure", 0.4),
    ("safe", 0.4),
    ("support", 0.3),
    ("supported", 0.3),
    ("progress", 0.5),
    ("advantage", 0.5),
    ("excellence", 0.8),
    ("remarkable", 0.7),
    ("impressive", 0.7),
    ("favorable", 0.6),
    ("favourable", 0.6),
    ("optimistic", 0.6),
    ("welcome", 0.5),
    ("love", 0.8),
    ("like", 0.3),
    ("nice", 0.6),
    ("well", 0.3),
    ("resilient", 0.5),
    ("award", 0.6),
    ("awarded", 0.6),
    ("expand", 0.4),
    ("expanded", 0.4),
    ("expansion", 0.4),
    // negative
    ("bad", -0.7),
    ("poor", -0.6),
    ("worse", -0.6),
    ("worst", -1.0),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("negative", -0.5),
    ("weak", -0.5),
    ("weaker", -0.5),
    ("weakness", -0.5),
    ("decline", -0.5),
    ("declined", -0.5),
    ("declining", -0.5),
    ("decrease", -0.3),
    ("decreased", -0.3),
    ("loss", -0.6),
    ("losses", -0.6),
    ("lose", -0.5),
    ("lost", -0.5),
    ("fail", -0.7),
    ("failed", -0.7),
    ("failure", -0.7),
    ("risk", -0.3),
    ("risks", -0.3),
    ("risky", -0.5),
    ("crisis", -0.7),
    ("problem", -0.5),
    ("problems", -0.5),
    ("difficult", -0.5),
    ("difficulty", -0.5),
    ("difficulties", -0.5),
    ("challenge", -0.2),
    ("challenging", -0.3),
    ("concern", -0.4),
    ("concerns", -0.4),
    ("uncertain", -0.4),
    ("uncertainty", -0.4),
    ("volatile", -0.4),
    ("volatility", -0.4),
    ("debt", -0.3),
    ("deficit", -0.5),
    ("damage", -0.6),
    ("damaged", -0.6),
    ("harm", -0.6),
    ("harmful", -0.7),
    ("threat", -0.5),
    ("danger", -0.6),
    ("dangerous", -0.7),
    ("unfortunately", -0.5),
    ("disappointing", -0.7),
    ("disappointed", -0.6),
    ("sad", -0.6),
    ("angry", -0.7),
    ("hate", -0.8),
    ("wrong", -0.5),
    ("error", -0.4),
    ("errors", -0.4),
    ("delay", -0.4),
    ("delayed", -0.4),
    ("shortage", -0.5),
    ("inflation", -0.3),
    ("recession", -0.7),
    ("downturn", -0.6),
    ("penalty", -0.5),
    ("fraud", -0.9),
    ("corruption", -0.9),
    ("pollution", -0.6),
    ("accident", -0.6),
    ("injury", -0.6),
    ("unstable", -0.5),
    ("insufficient", -0.5),
    ("inadequate", -0.5),
    ("ineffective", -0.5),
    ("costly", -0.4),
    ("expensive", -0.3),
    ("complaint", -0.5),
    ("complaints", -0.5),
];

/// Multipliers applied to the polarity word directly following them.
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("really", 1.2),
    ("highly", 1.3),
    ("quite", 1.1),
    ("so", 1.2),
    ("too", 1.2),
    ("most", 1.3),
    ("more", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("significantly", 1.3),
    ("particularly", 1.2),
    ("especially", 1.2),
];

/// Negators flip and dampen a polarity word up to three tokens later.
pub const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nor", "cannot", "don't", "doesn't", "isn't", "wasn't",
    "aren't", "won't", "didn't", "without", "hardly",
];
