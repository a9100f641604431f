//! Fixed classification vocabularies. Keywords stay in German: they are
//! matched against the archive's German catalogue text.

/// Crime categories in priority order, each with its lowercase keywords.
pub(super) const CRIME_KEYWORDS: &[(&str, &[&str])] = &[
    ("Mord", &["mord"]),
    ("Totschlag", &["totschlag"]),
    ("Raub", &["raub"]),
    ("Wilderei", &["wilderei", "wilddiebstahl", "wildern", "wilderer"]),
    ("Einbruchsdiebstahl", &["einbruch"]),
    ("Diebstahl", &["diebstahl", "dieb"]),
    ("Betrug", &["betrug", "betrüger"]),
    ("Urkundenfälschung", &["urkundenfälschung"]),
    ("Falschmünzerei", &["falschmünzerei", "falschgeld"]),
    ("Fälschung", &["fälschung"]),
    ("Unterschlagung", &["unterschlagung"]),
    ("Veruntreuung", &["veruntreuung"]),
    ("Körperverletzung", &["körperverletzung"]),
    ("Sexualdelikt", &["notzucht", "unzucht"]),
    ("Brandstiftung", &["brandstiftung"]),
    ("Sachbeschädigung", &["sachbeschädigung"]),
    ("Hehlerei", &["hehlerei", "hehler"]),
    ("Schmuggel", &["schmuggel"]),
    ("Amtsmissbrauch", &["amtsmissbrauch"]),
    ("Waffengesetz", &["waffengesetz", "waffenpatent"]),
];

/// Statute paragraphs of the historical penal code and the crime they denote.
pub(super) const STATUTES: &[(u32, &str)] = &[
    (2, "Waffengesetz"),
    (8, "Waffengesetz"),
    (32, "Waffengesetz"),
    (36, "Waffengesetz"),
    (140, "Mord"),
    (142, "Mord"),
    (171, "Wilderei"),
    (174, "Wilderei"),
    (176, "Wilderei"),
    (267, "Urkundenfälschung"),
    (431, "Betrug"),
    (460, "Diebstahl"),
    (467, "Unterschlagung"),
    (468, "Veruntreuung"),
];

/// Place names and the federal state they belong to.
pub(super) const GAZETTEER: &[(&str, &str)] = &[
    ("wien", "Wien"),
    ("st. pölten", "Niederösterreich"),
    ("klosterneuburg", "Niederösterreich"),
    ("baden", "Niederösterreich"),
    ("krems", "Niederösterreich"),
    ("amstetten", "Niederösterreich"),
    ("mödling", "Niederösterreich"),
    ("traiskirchen", "Niederösterreich"),
    ("schwechat", "Niederösterreich"),
    ("stockerau", "Niederösterreich"),
    ("tulln", "Niederösterreich"),
    ("ternitz", "Niederösterreich"),
    ("perchtoldsdorf", "Niederösterreich"),
    ("linz", "Oberösterreich"),
    ("wels", "Oberösterreich"),
    ("steyr", "Oberösterreich"),
    ("leonding", "Oberösterreich"),
    ("traun", "Oberösterreich"),
    ("braunau", "Oberösterreich"),
    ("gmunden", "Oberösterreich"),
    ("bad ischl", "Oberösterreich"),
    ("salzburg", "Salzburg"),
    ("hallein", "Salzburg"),
    ("saalfelden", "Salzburg"),
    ("innsbruck", "Tirol"),
    ("kufstein", "Tirol"),
    ("schwaz", "Tirol"),
    ("hall in tirol", "Tirol"),
    ("wörgl", "Tirol"),
    ("bregenz", "Vorarlberg"),
    ("feldkirch", "Vorarlberg"),
    ("lustenau", "Vorarlberg"),
    ("hohenems", "Vorarlberg"),
    ("bludenz", "Vorarlberg"),
    ("eisenstadt", "Burgenland"),
    ("klagenfurt", "Kärnten"),
    ("villach", "Kärnten"),
    ("wolfsberg", "Kärnten"),
    ("spittal", "Kärnten"),
    ("feldkirchen", "Kärnten"),
    ("bleiburg", "Kärnten"),
    ("graz", "Steiermark"),
    ("leoben", "Steiermark"),
    ("kapfenberg", "Steiermark"),
    ("rottenmann", "Steiermark"),
    ("oberzeiring", "Steiermark"),
    ("brettstein", "Steiermark"),
    ("bretstein", "Steiermark"),
    ("murau", "Steiermark"),
    ("judenburg", "Steiermark"),
    ("knittelfeld", "Steiermark"),
    ("voitsberg", "Steiermark"),
    ("deutschlandsberg", "Steiermark"),
    ("hartberg", "Steiermark"),
    ("fürstenfeld", "Steiermark"),
    ("radkersburg", "Steiermark"),
    ("feldbach", "Steiermark"),
    ("gleisdorf", "Steiermark"),
    ("weiz", "Steiermark"),
    ("bruck an der mur", "Steiermark"),
    ("mürzzuschlag", "Steiermark"),
    ("mariazell", "Steiermark"),
    ("liezen", "Steiermark"),
];

/// Object classes in priority order with their lowercase keywords.
pub(super) const OBJECT_CLASSES: &[(&str, &[&str])] = &[
    (
        "Waffe",
        &[
            "pistole", "revolver", "gewehr", "stutzen", "flobert", "messer", "dolch",
            "schalldämpfer", "säbel", "bajonett", "munition", "patrone",
        ],
    ),
    (
        "Dokument",
        &[
            "foto", "photo", "brief", "schreiben", "urkunde", "protokoll", "akte", "zeugnis",
            "ausweis",
        ],
    ),
    (
        "Werkzeug",
        &["schlüssel", "dietrich", "brecheisen", "feile", "säge", "hammer", "zange", "bohrer"],
    ),
    ("Textilie", &["kleidung", "textil"]),
    ("Schmuck", &["schmuck", "kette"]),
    ("Geld", &["münze", "geld"]),
];
