//! Irregular inflections mapped to their dictionary form.
//!
//! Covers strong verbs (past tense and past participle), suppletive forms of
//! `be`/`have`/`do`, irregular plurals and irregular comparatives. Regular
//! inflection is handled by suffix rules in the annotator.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Inflected form → lemma.
pub static IRREGULAR_FORMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // be / have / do
    map.extend([
        ("am", "be"),
        ("is", "be"),
        ("are", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("being", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("does", "do"),
        ("did", "do"),
        ("done", "do"),
        ("doing", "do"),
    ]);

    // Strong verbs: past tense and past participle
    map.extend([
        ("went", "go"),
        ("gone", "go"),
        ("goes", "go"),
        ("saw", "see"),
        ("seen", "see"),
        ("knew", "know"),
        ("known", "know"),
        ("gave", "give"),
        ("given", "give"),
        ("took", "take"),
        ("taken", "take"),
        ("made", "make"),
        ("came", "come"),
        ("became", "become"),
        ("wrote", "write"),
        ("written", "write"),
        ("spoke", "speak"),
        ("spoken", "speak"),
        ("broke", "break"),
        ("broken", "break"),
        ("chose", "choose"),
        ("chosen", "choose"),
        ("drove", "drive"),
        ("driven", "drive"),
        ("ate", "eat"),
        ("eaten", "eat"),
        ("fell", "fall"),
        ("fallen", "fall"),
        ("forgot", "forget"),
        ("forgotten", "forget"),
        ("froze", "freeze"),
        ("frozen", "freeze"),
        ("got", "get"),
        ("gotten", "get"),
        ("hid", "hide"),
        ("hidden", "hide"),
        ("rode", "ride"),
        ("ridden", "ride"),
        ("risen", "rise"),
        ("shook", "shake"),
        ("shaken", "shake"),
        ("showed", "show"),
        ("shown", "show"),
        ("stole", "steal"),
        ("stolen", "steal"),
        ("swore", "swear"),
        ("sworn", "swear"),
        ("tore", "tear"),
        ("torn", "tear"),
        ("threw", "throw"),
        ("thrown", "throw"),
        ("wore", "wear"),
        ("worn", "wear"),
        ("beaten", "beat"),
        ("bitten", "bite"),
        ("blew", "blow"),
        ("blown", "blow"),
        ("drew", "draw"),
        ("drawn", "draw"),
        ("flew", "fly"),
        ("flown", "fly"),
        ("grew", "grow"),
        ("grown", "grow"),
        ("began", "begin"),
        ("begun", "begin"),
        ("drank", "drink"),
        ("drunk", "drink"),
        ("rang", "ring"),
        ("rung", "ring"),
        ("sang", "sing"),
        ("sung", "sing"),
        ("sank", "sink"),
        ("sunk", "sink"),
        ("swam", "swim"),
        ("swum", "swim"),
        ("ran", "run"),
        ("won", "win"),
        ("hung", "hang"),
        ("struck", "strike"),
        ("stuck", "stick"),
        ("swung", "swing"),
        ("woke", "wake"),
        ("woken", "wake"),
        ("forgave", "forgive"),
        ("forgiven", "forgive"),
        ("mistook", "mistake"),
        ("mistaken", "mistake"),
        ("understood", "understand"),
        ("withdrew", "withdraw"),
        ("withdrawn", "withdraw"),
    ]);

    // Weak verbs with irregular stems
    map.extend([
        ("said", "say"),
        ("paid", "pay"),
        ("laid", "lay"),
        ("heard", "hear"),
        ("sold", "sell"),
        ("told", "tell"),
        ("held", "hold"),
        ("left", "leave"),
        ("kept", "keep"),
        ("slept", "sleep"),
        ("wept", "weep"),
        ("swept", "sweep"),
        ("felt", "feel"),
        ("dealt", "deal"),
        ("meant", "mean"),
        ("sent", "send"),
        ("spent", "spend"),
        ("bent", "bend"),
        ("lent", "lend"),
        ("built", "build"),
        ("burnt", "burn"),
        ("learnt", "learn"),
        ("brought", "bring"),
        ("bought", "buy"),
        ("caught", "catch"),
        ("fought", "fight"),
        ("found", "find"),
        ("fled", "flee"),
        ("fed", "feed"),
        ("led", "lead"),
        ("met", "meet"),
        ("sought", "seek"),
        ("taught", "teach"),
        ("thought", "think"),
        ("stood", "stand"),
        ("sat", "sit"),
        ("lost", "lose"),
        ("shot", "shoot"),
        ("shone", "shine"),
        ("slid", "slide"),
        ("crept", "creep"),
        ("dug", "dig"),
        ("bred", "breed"),
        ("lit", "light"),
        ("knelt", "kneel"),
    ]);

    // Irregular plurals
    map.extend([
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("people", "person"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("geese", "goose"),
        ("mice", "mouse"),
        ("oxen", "ox"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("halves", "half"),
        ("shelves", "shelf"),
        ("wolves", "wolf"),
        ("thieves", "thief"),
        ("analyses", "analysis"),
        ("crises", "crisis"),
        ("theses", "thesis"),
        ("phenomena", "phenomenon"),
        ("criteria", "criterion"),
    ]);

    // Irregular comparatives and superlatives
    map.extend([
        ("better", "good"),
        ("best", "good"),
        ("worse", "bad"),
        ("worst", "bad"),
        ("further", "far"),
        ("furthest", "far"),
        ("farther", "far"),
        ("farthest", "far"),
    ]);

    map
});

/// Look up the lemma of an irregular form (input must be lowercase).
pub fn irregular_lemma(word: &str) -> Option<&'static str> {
    IRREGULAR_FORMS.get(word).copied()
}
