/// One testable style-guide rule, rendered into prompt text by the
/// validation-rule modules.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub code: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub test_question: &'static str,
    pub good: &'static [&'static str],
    pub bad: &'static [&'static str],
}

/// Rule family identifiers, one prompt module per family in the classic
/// catalog.
pub const RULE_FAMILIES: [&str; 7] = ["ARAI", "CON", "ESS", "INT", "SAM", "STR", "VER"];

pub fn rules_for_family(family: &str) -> &'static [RuleSpec] {
    match family {
        "ARAI" => &ARAI_RULES,
        "CON" => &CON_RULES,
        "ESS" => &ESS_RULES,
        "INT" => &INT_RULES,
        "SAM" => &SAM_RULES,
        "STR" => &STR_RULES,
        "VER" => &VER_RULES,
        _ => &[],
    }
}

pub fn all_rules() -> impl Iterator<Item = &'static RuleSpec> {
    RULE_FAMILIES.iter().flat_map(|family| rules_for_family(family).iter())
}

pub static ARAI_RULES: [RuleSpec; 2] = [
    RuleSpec {
        code: "ARAI-01",
        title: "Geen modelartefacten",
        description: "De definitie bevat geen disclaimers, aanhalingstekens of meta-opmerkingen van het taalmodel.",
        test_question: "Bevat de output uitsluitend de definitie zelf, zonder inleidende of afsluitende tekst?",
        good: &["maatregel die volgt op een normovertreding"],
        bad: &[
            "Hier is de definitie: maatregel die volgt op een normovertreding",
            "\"maatregel die volgt op een normovertreding\"",
        ],
    },
    RuleSpec {
        code: "ARAI-02",
        title: "Ontologische marker aanwezig",
        description: "De eerste regel van de ruwe output bevat de marker 'Ontologische categorie: ...' met één van de vier categorieën.",
        test_question: "Staat de ontologische marker op de eerste regel van de output?",
        good: &["Ontologische categorie: resultaat"],
        bad: &["(geen markerregel aanwezig)"],
    },
];

pub static CON_RULES: [RuleSpec; 2] = [
    RuleSpec {
        code: "CON-01",
        title: "Contextspecifieke formulering zonder expliciete benoeming",
        description: "Formuleer de definitie zó dat deze past binnen de opgegeven context(en), zonder deze expliciet te benoemen in de definitie zelf.",
        test_question: "Is de betekenis contextspecifiek geformuleerd, zonder dat de context letterlijk of verwijzend wordt genoemd?",
        good: &[
            "Toezicht is het systematisch volgen van handelingen om te beoordelen of ze voldoen aan vastgestelde normen.",
            "Registratie is het formeel vastleggen van gegevens in een geautoriseerd systeem.",
        ],
        bad: &[
            "Toezicht is controle uitgevoerd door DJI in juridische context, op basis van het Wetboek van Strafvordering.",
            "Registratie: het vastleggen van persoonsgegevens binnen de organisatie DJI, in strafrechtelijke context.",
        ],
    },
    RuleSpec {
        code: "CON-02",
        title: "Baseren op authentieke bron",
        description: "Gebruik een gezaghebbende of officiële bron als basis voor de definitie.",
        test_question: "Is duidelijk op welke authentieke of officiële bron de definitie is gebaseerd?",
        good: &[
            "gegevensverwerking: iedere handeling met gegevens zoals bedoeld in de AVG",
            "delict: gedraging die volgens het Wetboek van Strafrecht strafbaar is gesteld",
        ],
        bad: &[
            "gegevensverwerking: handeling met gegevens (geen bron vermeld)",
            "delict: iets strafbaars (geen verwijzing naar wet)",
        ],
    },
];

pub static ESS_RULES: [RuleSpec; 4] = [
    RuleSpec {
        code: "ESS-01",
        title: "Essentie, niet doel",
        description: "Een definitie beschrijft wat iets is, niet wat het doel of de bedoeling ervan is.",
        test_question: "Bevat de definitie uitsluitend de essentie van het begrip, zonder doel- of gebruiksgericht taalgebruik?",
        good: &[
            "meldpunt: instantie die meldingen registreert over strafbare feiten",
            "sanctie: maatregel die volgt op normovertreding",
        ],
        bad: &[
            "meldpunt: instantie om meldingen te kunnen verwerken",
            "sanctie: maatregel met als doel naleving te bevorderen",
        ],
    },
    RuleSpec {
        code: "ESS-02",
        title: "Ontologische categorie expliciteren",
        description: "Uit de definitie moet ondubbelzinnig blijken welke betekenislaag bedoeld wordt: soort (type), exemplaar (particulier), proces (activiteit) of resultaat (uitkomst).",
        test_question: "Geeft de definitie ondubbelzinnig aan of het begrip een type, exemplaar, proces of resultaat is?",
        good: &["activiteit waarbij gecontroleerd wordt of aan vastgestelde normen is voldaan"],
        bad: &["iets met controle"],
    },
    RuleSpec {
        code: "ESS-04",
        title: "Toetsbaarheid",
        description: "Een definitie bevat objectief toetsbare elementen (harde termijnen, aantallen, percentages, meetbare criteria).",
        test_question: "Bevat de definitie elementen waarmee objectief is vast te stellen of iets onder het begrip valt?",
        good: &[
            "…binnen 3 dagen nadat het verzoek is ingediend…",
            "…tenminste 80% van de steekproef voldoet…",
        ],
        bad: &["…zo snel mogelijk na ontvangst…", "…zo veel mogelijk resultaten…"],
    },
    RuleSpec {
        code: "ESS-05",
        title: "Voldoende onderscheidend",
        description: "Een definitie maakt duidelijk wat het begrip uniek maakt ten opzichte van verwante begrippen.",
        test_question: "Maakt de definitie expliciet duidelijk waarin het begrip zich onderscheidt van andere begrippen?",
        good: &[
            "Reclasseringstoezicht: toezicht gericht op gedragsverandering, in tegenstelling tot detentietoezicht dat gericht is op vrijheidsbeneming.",
        ],
        bad: &["Toezicht: het houden van toezicht op iemand."],
    },
];

pub static INT_RULES: [RuleSpec; 6] = [
    RuleSpec {
        code: "INT-01",
        title: "Compacte en begrijpelijke zin",
        description: "Een definitie is compact en in één enkele zin geformuleerd.",
        test_question: "Is de definitie geformuleerd als één enkele, begrijpelijke zin?",
        good: &[
            "transitie-eis: eis die een organisatie ondersteunt om migratie van de huidige naar de toekomstige situatie mogelijk te maken.",
        ],
        bad: &[
            "transitie-eis: eis die migratie mogelijk maakt. In tegenstelling tot andere eisen vertegenwoordigen transitie-eisen tijdelijke behoeften.",
        ],
    },
    RuleSpec {
        code: "INT-02",
        title: "Geen beslisregel",
        description: "Een definitie bevat geen beslisregels of voorwaardelijke formuleringen.",
        test_question: "Bevat de definitie geen voorwaardelijke of normatieve formuleringen zoals beslisregels?",
        good: &["Beschikking: schriftelijk besluit genomen door een bevoegde autoriteit."],
        bad: &["Beschikking: schriftelijk besluit, mits de aanvraag compleet is ingediend."],
    },
    RuleSpec {
        code: "INT-03",
        title: "Voornaamwoord-verwijzing duidelijk",
        description: "Definities bevatten geen voornaamwoorden waarvan niet direct duidelijk is waarnaar verwezen wordt.",
        test_question: "Bevat de definitie voornaamwoorden zoals 'deze', 'dit', 'die'? Zo ja: is direct helder waarnaar ze verwijzen?",
        good: &["Voorwaarde: bepaling die aangeeft onder welke omstandigheden een handeling is toegestaan."],
        bad: &["Voorwaarde: bepaling die aangeeft onder welke omstandigheden deze geldt."],
    },
    RuleSpec {
        code: "INT-06",
        title: "Definitie bevat geen toelichting",
        description: "Een definitie bevat geen nadere toelichting of voorbeelden, maar uitsluitend de afbakening van het begrip.",
        test_question: "Bevat de definitie signalen van toelichting zoals 'bijvoorbeeld', 'zoals', 'dit houdt in'?",
        good: &["model: vereenvoudigde weergave van de werkelijkheid"],
        bad: &["model: vereenvoudigde weergave van de werkelijkheid, die visueel wordt weergegeven"],
    },
    RuleSpec {
        code: "INT-07",
        title: "Alleen toegankelijke afkortingen",
        description: "Gebruikte afkortingen zijn voorzien van een direct toegankelijke referentie.",
        test_question: "Bevat de definitie afkortingen? Zo ja: zijn deze in dezelfde tekst uitgelegd?",
        good: &["Dienst Justitiële Inrichtingen (DJI)", "AVG (Algemene verordening gegevensbescherming)"],
        bad: &["DJI voert toezicht uit.", "De AVG vereist naleving."],
    },
    RuleSpec {
        code: "INT-08",
        title: "Positieve formulering",
        description: "Een definitie wordt in principe positief geformuleerd, zonder ontkenningen; uitgezonderd onderdelen die de definitie specifieker maken.",
        test_question: "Is de definitie positief geformuleerd en vermijdt deze onnodige negatieve formuleringen?",
        good: &["bevoegd persoon: medewerker met formele autorisatie om gegevens in te zien"],
        bad: &["bevoegd persoon: iemand die niet onbevoegd is"],
    },
];

pub static SAM_RULES: [RuleSpec; 3] = [
    RuleSpec {
        code: "SAM-01",
        title: "Kwalificatie leidt niet tot afwijking",
        description: "Een definitie mag niet afwijken van de betekenis die de term in andere contexten heeft.",
        test_question: "Leidt de gebruikte kwalificatie tot een betekenis die wezenlijk afwijkt van het algemeen aanvaarde begrip?",
        good: &[
            "proces: reeks activiteiten met een gemeenschappelijk doel",
            "juridisch proces: proces binnen de context van rechtspleging",
        ],
        bad: &["proces: technische afhandeling van informatie tussen systemen"],
    },
    RuleSpec {
        code: "SAM-05",
        title: "Geen cirkeldefinities",
        description: "Een cirkeldefinitie (wederzijdse of meerdiepse verwijzing tussen begrippen) mag niet voorkomen.",
        test_question: "Treden er wederzijdse verwijzingen op tussen begrippen?",
        good: &["object: fysiek ding dat bestaat in ruimte en tijd"],
        bad: &["object: een ding is een object", "ding: een object is een ding"],
    },
    RuleSpec {
        code: "SAM-07",
        title: "Geen betekenisverruiming",
        description: "De definitie mag de betekenis van de term niet uitbreiden met elementen die niet in de term besloten liggen.",
        test_question: "Bevat de definitie uitsluitend elementen die inherent zijn aan de term?",
        good: &["toezicht houden: het controleren of regels worden nageleefd"],
        bad: &["toezicht houden: het controleren en indien nodig corrigeren van gedrag"],
    },
];

pub static STR_RULES: [RuleSpec; 7] = [
    RuleSpec {
        code: "STR-01",
        title: "Start met zelfstandig naamwoord",
        description: "De definitie start met een zelfstandig naamwoord of naamwoordgroep, niet met een werkwoord, koppelwerkwoord of lidwoord.",
        test_question: "Begint de definitie met een zelfstandig naamwoord of naamwoordgroep?",
        good: &["proces dat beslissers identificeert…", "maatregel die recidive voorkomt…"],
        bad: &["is een maatregel die recidive voorkomt", "wordt toegepast in het gevangeniswezen"],
    },
    RuleSpec {
        code: "STR-02",
        title: "Kick-off is niet de term zelf",
        description: "De definitie begint met een breder begrip en geeft daarna de verbijzondering aan.",
        test_question: "Begint de definitie met een breder begrip en specificeert het vervolgens het verschil?",
        good: &["analist: professional verantwoordelijk voor …"],
        bad: &["analist: analist die verantwoordelijk is voor …"],
    },
    RuleSpec {
        code: "STR-03",
        title: "Definitie is geen synoniem",
        description: "De definitie mag niet simpelweg een synoniem van de term zijn.",
        test_question: "Is de definitie meer dan alleen een synoniem van de term?",
        good: &["evaluatie: resultaat van iets beoordelen, appreciëren of interpreteren"],
        bad: &["evaluatie: beoordeling", "registratie: vastlegging (in een systeem)"],
    },
    RuleSpec {
        code: "STR-04",
        title: "Kick-off vervolgen met toespitsing",
        description: "Na de algemene opening volgt direct een toespitsing op het specifieke begrip.",
        test_question: "Volgt na de algemene opening direct een toespitsing?",
        good: &["proces dat beslissers informeert", "gegeven over de verblijfplaats van een betrokkene"],
        bad: &["proces", "activiteit die plaatsvindt"],
    },
    RuleSpec {
        code: "STR-05",
        title: "Definitie is geen constructie",
        description: "Een definitie geeft aan wat iets is, niet uit welke onderdelen het bestaat.",
        test_question: "Geeft de definitie aan wat het begrip is, in plaats van alleen waar het uit bestaat?",
        good: &["motorvoertuig: gemotoriseerd voertuig dat niet over rails rijdt"],
        bad: &["motorvoertuig: een voertuig met een chassis, vier wielen en een motor van meer dan 50 cc"],
    },
    RuleSpec {
        code: "STR-07",
        title: "Geen dubbele ontkenning",
        description: "Een definitie bevat geen dubbele ontkenning.",
        test_question: "Bevat de definitie een dubbele ontkenning die de begrijpelijkheid schaadt?",
        good: &["Beveiliging: maatregelen die toegang beperken tot bevoegde personen"],
        bad: &["Beveiliging: maatregelen die het niet onmogelijk maken om geen toegang te verkrijgen"],
    },
    RuleSpec {
        code: "STR-08",
        title: "Geen subjectieve termen",
        description: "Een definitie bevat geen subjectieve of waarderende woorden zoals 'belangrijk', 'essentieel' of 'adequaat'.",
        test_question: "Is de definitie vrij van subjectieve kwalificaties?",
        good: &["voorziening die ongeautoriseerde toegang voorkomt"],
        bad: &["belangrijke voorziening die ongeautoriseerde toegang voorkomt"],
    },
];

pub static VER_RULES: [RuleSpec; 2] = [
    RuleSpec {
        code: "VER-01",
        title: "Lidwoord-verwijzing duidelijk",
        description: "Definities bevatten geen onduidelijke verwijzingen met 'de' of 'het' naar niet nader genoemde instellingen of systemen.",
        test_question: "Bevat de definitie zinsdelen als 'de instelling' of 'het systeem' zonder dat expliciet benoemd is welke bedoeld wordt?",
        good: &["Een instelling (de Raad voor de Rechtspraak) neemt beslissingen binnen het strafrechtelijk systeem."],
        bad: &["De instelling neemt beslissingen binnen het strafrechtelijk systeem."],
    },
    RuleSpec {
        code: "VER-02",
        title: "Wetsverwijzing voluit",
        description: "Verwijzingen naar wet- en regelgeving worden voluit geschreven, inclusief artikelnummer waar relevant.",
        test_question: "Zijn verwijzingen naar wetgeving volledig en eenduidig?",
        good: &["gedraging die volgens artikel 310 van het Wetboek van Strafrecht strafbaar is gesteld"],
        bad: &["gedraging die volgens de wet strafbaar is"],
    },
];
