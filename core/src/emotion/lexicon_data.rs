// Valence lexicon and modifier word lists for the compound scorer.
// Valences are on the -4..=4 scale of the VADER sentiment lexicon.

pub(super) const VALENCES: &[(&str, f64)] = &[
    // positive
    ("accept", 1.6),
    ("admire", 2.1),
    ("adorable", 2.2),
    ("agree", 1.5),
    ("amazing", 2.8),
    ("amused", 1.6),
    ("appreciate", 1.7),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("bless", 1.8),
    ("bliss", 2.7),
    ("brave", 2.4),
    ("brilliant", 2.8),
    ("calm", 1.3),
    ("care", 2.2),
    ("celebrate", 2.7),
    ("charming", 2.8),
    ("cheer", 2.3),
    ("cheerful", 2.5),
    ("comfort", 1.5),
    ("confident", 2.2),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("cool", 1.3),
    ("cute", 2.0),
    ("delight", 2.9),
    ("delighted", 3.1),
    ("delightful", 2.8),
    ("easy", 1.9),
    ("ecstatic", 2.3),
    ("elegant", 2.1),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 2.7),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fabulous", 2.4),
    ("fantastic", 2.6),
    ("fine", 0.8),
    ("free", 2.3),
    ("friendly", 2.2),
    ("fun", 2.3),
    ("funny", 1.9),
    ("generous", 2.3),
    ("glad", 2.0),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("grateful", 2.0),
    ("great", 3.1),
    ("haha", 2.0),
    ("happiness", 2.6),
    ("happy", 2.7),
    ("heaven", 2.3),
    ("helpful", 1.8),
    ("hope", 1.9),
    ("hopeful", 1.6),
    ("hug", 2.1),
    ("impressive", 2.3),
    ("incredible", 2.4),
    ("inspiring", 2.5),
    ("interesting", 1.7),
    ("joy", 2.8),
    ("joyful", 2.9),
    ("kind", 2.4),
    ("laugh", 2.6),
    ("like", 2.0),
    ("liked", 1.8),
    ("lol", 2.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("loving", 2.9),
    ("lucky", 1.8),
    ("magnificent", 3.4),
    ("marvelous", 2.9),
    ("nice", 1.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("outstanding", 3.0),
    ("peace", 2.5),
    ("peaceful", 2.2),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("please", 1.3),
    ("pleased", 1.9),
    ("pretty", 2.2),
    ("proud", 2.1),
    ("relaxed", 2.2),
    ("relief", 2.1),
    ("safe", 1.9),
    ("satisfied", 1.8),
    ("smile", 1.5),
    ("splendid", 2.8),
    ("strong", 2.3),
    ("success", 2.7),
    ("successful", 2.8),
    ("super", 2.9),
    ("superb", 3.1),
    ("sweet", 2.0),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("thrilled", 2.5),
    ("terrific", 3.2),
    ("triumph", 3.0),
    ("trust", 2.3),
    ("useful", 1.9),
    ("warm", 0.9),
    ("welcome", 2.0),
    ("well", 1.1),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("won", 2.7),
    ("wow", 2.8),
    ("yay", 2.4),
    ("yes", 1.7),
    // negative
    ("abandoned", -2.1),
    ("abuse", -3.2),
    ("afraid", -2.0),
    ("agony", -3.2),
    ("alone", -1.0),
    ("anger", -2.7),
    ("angry", -2.3),
    ("annoyed", -1.6),
    ("annoying", -1.7),
    ("anxious", -1.0),
    ("ashamed", -2.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("betrayed", -2.9),
    ("bitter", -1.8),
    ("boring", -1.3),
    ("broke", -1.8),
    ("broken", -2.1),
    ("cry", -2.1),
    ("crying", -2.1),
    ("damn", -1.7),
    ("dead", -3.3),
    ("death", -2.9),
    ("depressed", -2.3),
    ("depressing", -1.6),
    ("despair", -3.1),
    ("destroyed", -3.4),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disaster", -3.1),
    ("disgusting", -2.4),
    ("dislike", -1.6),
    ("dread", -2.0),
    ("dumb", -2.3),
    ("empty", -0.8),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("fear", -2.2),
    ("frustrated", -2.0),
    ("frustrating", -1.9),
    ("furious", -2.7),
    ("grief", -2.2),
    ("guilty", -1.8),
    ("hate", -2.7),
    ("hated", -3.2),
    ("hates", -1.9),
    ("heartbroken", -3.3),
    ("hell", -3.6),
    ("helpless", -2.0),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("ill", -1.8),
    ("jealous", -2.0),
    ("kill", -3.7),
    ("lonely", -2.0),
    ("lose", -1.7),
    ("lost", -1.3),
    ("mad", -2.2),
    ("mess", -1.5),
    ("miserable", -2.2),
    ("miss", -0.6),
    ("nasty", -2.6),
    ("nervous", -1.1),
    ("no", -1.2),
    ("pain", -2.3),
    ("painful", -2.4),
    ("panic", -2.3),
    ("pathetic", -2.2),
    ("poor", -2.1),
    ("problem", -1.7),
    ("rage", -2.6),
    ("regret", -1.9),
    ("rude", -2.0),
    ("sad", -2.1),
    ("sadness", -1.9),
    ("scared", -1.9),
    ("shame", -2.1),
    ("shocked", -1.3),
    ("sick", -2.3),
    ("sorrow", -2.4),
    ("sorry", -0.3),
    ("stress", -1.8),
    ("stressed", -1.4),
    ("stupid", -2.4),
    ("suffer", -2.5),
    ("terrible", -2.1),
    ("terrified", -3.0),
    ("tired", -1.9),
    ("tragic", -3.4),
    ("trouble", -1.7),
    ("ugly", -2.3),
    ("unfair", -2.1),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("useless", -1.8),
    ("weak", -1.9),
    ("worried", -1.2),
    ("worry", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// Degree modifiers and their sign: `true` amplifies, `false` dampens.
pub(super) const BOOSTERS: &[(&str, bool)] = &[
    ("absolutely", true),
    ("amazingly", true),
    ("awfully", true),
    ("completely", true),
    ("considerably", true),
    ("deeply", true),
    ("enormously", true),
    ("entirely", true),
    ("especially", true),
    ("exceptionally", true),
    ("extremely", true),
    ("fabulously", true),
    ("greatly", true),
    ("highly", true),
    ("hugely", true),
    ("incredibly", true),
    ("intensely", true),
    ("majorly", true),
    ("more", true),
    ("most", true),
    ("particularly", true),
    ("purely", true),
    ("quite", true),
    ("really", true),
    ("remarkably", true),
    ("so", true),
    ("substantially", true),
    ("thoroughly", true),
    ("totally", true),
    ("tremendously", true),
    ("truly", true),
    ("unbelievably", true),
    ("utterly", true),
    ("very", true),
    ("almost", false),
    ("barely", false),
    ("hardly", false),
    ("kinda", false),
    ("less", false),
    ("little", false),
    ("marginally", false),
    ("occasionally", false),
    ("partly", false),
    ("scarcely", false),
    ("slightly", false),
    ("somewhat", false),
    ("sorta", false),
];

pub(super) const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "wasnt", "werent",
    "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];
