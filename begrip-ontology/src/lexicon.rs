use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Legal subdomains covered by the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalDomain {
    Strafrecht,
    Bestuursrecht,
    CivielRecht,
    AlgemeenJuridisch,
}

impl LegalDomain {
    pub const ALL: [LegalDomain; 4] = [
        LegalDomain::Strafrecht,
        LegalDomain::Bestuursrecht,
        LegalDomain::CivielRecht,
        LegalDomain::AlgemeenJuridisch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LegalDomain::Strafrecht => "strafrecht",
            LegalDomain::Bestuursrecht => "bestuursrecht",
            LegalDomain::CivielRecht => "civiel_recht",
            LegalDomain::AlgemeenJuridisch => "algemeen_juridisch",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "strafrecht" => Some(LegalDomain::Strafrecht),
            "bestuursrecht" => Some(LegalDomain::Bestuursrecht),
            "civiel_recht" | "civielrecht" => Some(LegalDomain::CivielRecht),
            "algemeen_juridisch" => Some(LegalDomain::AlgemeenJuridisch),
            _ => None,
        }
    }
}

impl std::fmt::Display for LegalDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const STRAFRECHT_TERMS: &[&str] = &[
    // Actoren
    "verdachte",
    "dader",
    "slachtoffer",
    "getuige",
    "medeverdachte",
    "medepleger",
    "medeplichtige",
    "benadeelde",
    "aangever",
    "veroordeelde",
    "recidivist",
    "jeugdige",
    "minderjarige",
    "advocaat",
    "raadsman",
    "officier van justitie",
    "rechter",
    "rechter-commissaris",
    "griffier",
    "reclassering",
    "voogd",
    "curator",
    "bewindvoerder",
    // Handelingen en procedures
    "aangifte",
    "aanhouding",
    "arrestatie",
    "fouillering",
    "doorzoeking",
    "inbeslagname",
    "verhoor",
    "ondervraging",
    "confrontatie",
    "inverzekeringstelling",
    "voorgeleiding",
    "bewaring",
    "gevangenhouding",
    "voorlopige hechtenis",
    "dagvaarding",
    "oproeping",
    "betekening",
    "zitting",
    "pleidooi",
    "requisitoir",
    "strafeis",
    "verweer",
    "beraadslaging",
    "uitspraak",
    "vonnis",
    "arrest",
    "veroordeling",
    "vrijspraak",
    "schuldigverklaring",
    "straf",
    "maatregel",
    "gevangenisstraf",
    "hechtenis",
    "taakstraf",
    "geldboete",
    "voorwaardelijke straf",
    "proeftijd",
    "hoger beroep",
    "cassatie",
    "verzet",
    "herziening",
    "gratie",
    "voorwaardelijke invrijheidstelling",
    "elektronisch toezicht",
    // Documenten en besluiten
    "proces-verbaal",
    "strafdossier",
    "vordering",
    "beschikking",
    "beslissing",
    "strafbeschikking",
    "transactie",
    "sepot",
    "seponering",
    "tenlastelegging",
    "akte",
    "verklaring",
    "bekentenis",
    "getuigenverklaring",
    "deskundigenrapport",
    "reclasseringsrapport",
    "verklaring omtrent gedrag",
    "strafblad",
    "dossier",
];

const BESTUURSRECHT_TERMS: &[&str] = &[
    // Actoren
    "burger",
    "belanghebbende",
    "aanvrager",
    "vergunninghouder",
    "bezwaarmaker",
    "appellant",
    "verweerder",
    "gemachtigde",
    "bestuursorgaan",
    "bevoegd gezag",
    "burgemeester",
    "gedeputeerde staten",
    "minister",
    "staatssecretaris",
    "ambtenaar",
    "inspecteur",
    "handhaver",
    "toezichthouder",
    "bezwaarcommissie",
    "ombudsman",
    "bestuursrechter",
    "voorzieningenrechter",
    // Handelingen en procedures
    "aanvraag",
    "verzoek",
    "melding",
    "kennisgeving",
    "zienswijze",
    "inspraak",
    "besluitvorming",
    "besluit",
    "vaststelling",
    "goedkeuring",
    "weigering",
    "intrekking",
    "wijziging",
    "verlenging",
    "bekendmaking",
    "terinzagelegging",
    "bezwaar",
    "bezwaarprocedure",
    "hoorzitting",
    "heroverweging",
    "administratief beroep",
    "beroep",
    "voorlopige voorziening",
    "schorsing",
    "vernietiging",
    "handhaving",
    "sanctie",
    "bestuursdwang",
    "dwangsom",
    "last onder dwangsom",
    "waarschuwing",
    "herstelmaatregel",
    "gedogen",
    "toezicht",
    "controle",
    // Documenten en instrumenten
    "vergunning",
    "ontheffing",
    "vrijstelling",
    "concessie",
    "subsidie",
    "beleidsregel",
    "verordening",
    "regeling",
    "mandaat",
    "delegatie",
    "convenant",
    "bestemmingsplan",
    "omgevingsvergunning",
    "bouwvergunning",
    "evenementenvergunning",
];

const CIVIEL_RECHT_TERMS: &[&str] = &[
    // Partijen en relaties
    "koper",
    "verkoper",
    "huurder",
    "verhuurder",
    "pachter",
    "schuldenaar",
    "schuldeiser",
    "crediteur",
    "debiteur",
    "opdrachtgever",
    "opdrachtnemer",
    "aannemer",
    "werkgever",
    "werknemer",
    "vennoot",
    "aandeelhouder",
    "bestuurder",
    "commissaris",
    "executeur",
    "erfgenaam",
    "erflater",
    "schenker",
    "borg",
    "pandhouder",
    "hypotheekhouder",
    "vruchtgebruiker",
    // Overeenkomsten en rechtshandelingen
    "koopovereenkomst",
    "huurovereenkomst",
    "pachtovereenkomst",
    "arbeidsovereenkomst",
    "opdracht",
    "lastgeving",
    "bemiddeling",
    "licentieovereenkomst",
    "bewaargeving",
    "borgstelling",
    "schenking",
    "dading",
    "vaststellingsovereenkomst",
    "cessie",
    "subrogatie",
    "novatie",
    "kwijtschelding",
    "verrekening",
    "opzegging",
    "ontbinding",
    "nietigheid",
    "bekrachtiging",
    "dwaling",
    "bedrog",
    "bedreiging",
    "wilsgebrek",
    "toestemming",
    // Goederen en rechten
    "eigendom",
    "bezit",
    "houderschap",
    "vruchtgebruik",
    "erfpacht",
    "opstal",
    "erfdienstbaarheid",
    "pand",
    "hypotheek",
    "beslag",
    "retentierecht",
    "zekerheidsrecht",
    "roerende zaak",
    "onroerende zaak",
    "registergoed",
    "vorderingsrecht",
];

const ALGEMEEN_JURIDISCH_TERMS: &[&str] = &[
    // Rechtspersonen en organisaties
    "rechtspersoon",
    "natuurlijk persoon",
    "vennootschap",
    "maatschap",
    "coöperatie",
    "vereniging",
    "stichting",
    "overheidsorgaan",
    "zelfstandig bestuursorgaan",
    "openbaar lichaam",
    "gemeente",
    "provincie",
    "waterschap",
    "ministerie",
    "agentschap",
    "inspectie",
    "autoriteit",
    "rechtbank",
    "gerechtshof",
    "hoge raad",
    "raad van state",
    "tuchtcollege",
    // Algemene juridische concepten
    "recht",
    "plicht",
    "bevoegdheid",
    "aanspraak",
    "rechtsverhouding",
    "rechtsfeit",
    "rechtshandeling",
    "rechtsgevolg",
    "rechtssubject",
    "rechtsobject",
    "rechtsregel",
    "rechtsnorm",
    "rechtsbeginsel",
    "rechtszekerheid",
    "redelijkheid",
    "billijkheid",
    "proportionaliteit",
    "subsidiariteit",
    "zorgvuldigheid",
    "motivering",
    "belangenafweging",
    "beleidsvrijheid",
    "toetsing",
    "rechtmatigheid",
    "onrechtmatigheid",
    "verjaring",
    "stuiting",
    "verval",
    "rechtsverwerking",
    "vertrouwensbeginsel",
    "gelijkheidsbeginsel",
    "hoor en wederhoor",
    "openbaarheid",
    // Procedures en documenten
    "procedure",
    "proces",
    "geding",
    "instantie",
    "termijn",
    "beroepstermijn",
    "bezwaartermijn",
    "vervaltermijn",
    "verjaringstermijn",
    "proceshandeling",
    "processtuk",
    "authentieke akte",
    "notariële akte",
    "executoriale titel",
    "dwangbevel",
    "exploot",
    "verzoekschrift",
    "beroepschrift",
    "bezwaarschrift",
    "klaagschrift",
    "conclusie",
    "memorie",
    "pleitnota",
    "bewijs",
    "bewijslast",
    "bewijsmiddel",
    "deskundigenbericht",
    "vermoeden",
    "eed",
];

/// In-memory Dutch legal vocabulary organized per subdomain. Loaded eagerly;
/// the tool is single-user and the tables are small.
#[derive(Debug, Clone)]
pub struct LegalLexicon {
    lexicons: HashMap<LegalDomain, &'static [&'static str]>,
}

impl LegalLexicon {
    pub fn new() -> Self {
        let mut lexicons: HashMap<LegalDomain, &'static [&'static str]> = HashMap::new();
        lexicons.insert(LegalDomain::Strafrecht, STRAFRECHT_TERMS);
        lexicons.insert(LegalDomain::Bestuursrecht, BESTUURSRECHT_TERMS);
        lexicons.insert(LegalDomain::CivielRecht, CIVIEL_RECHT_TERMS);
        lexicons.insert(LegalDomain::AlgemeenJuridisch, ALGEMEEN_JURIDISCH_TERMS);
        Self { lexicons }
    }

    pub fn all_terms(&self) -> Vec<&'static str> {
        let mut terms: Vec<&'static str> = self.lexicons.values().flat_map(|t| t.iter().copied()).collect();
        terms.sort_unstable();
        terms.dedup();
        terms
    }

    pub fn domain_terms(&self, domain: LegalDomain) -> &'static [&'static str] {
        self.lexicons.get(&domain).copied().unwrap_or(&[])
    }

    pub fn contains(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        self.lexicons
            .values()
            .any(|terms| terms.iter().any(|t| *t == needle))
    }

    /// Scan `text` for every lexicon term, grouped per domain.
    pub fn find_matching_terms(&self, text: &str) -> HashMap<LegalDomain, Vec<&'static str>> {
        let text_lower = text.to_lowercase();
        let mut matches = HashMap::new();

        for (domain, terms) in &self.lexicons {
            let domain_matches: Vec<&'static str> = terms
                .iter()
                .copied()
                .filter(|term| text_lower.contains(term))
                .collect();
            if !domain_matches.is_empty() {
                matches.insert(*domain, domain_matches);
            }
        }

        matches
    }
}

impl Default for LegalLexicon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_covers_four_domains() {
        let lexicon = LegalLexicon::new();
        for domain in LegalDomain::ALL {
            assert!(!lexicon.domain_terms(domain).is_empty(), "{domain} is empty");
        }
    }

    #[test]
    fn test_contains() {
        let lexicon = LegalLexicon::new();
        assert!(lexicon.contains("verdachte"));
        assert!(lexicon.contains("  Vergunning "));
        assert!(!lexicon.contains("fiets"));
    }

    #[test]
    fn test_find_matching_terms() {
        let lexicon = LegalLexicon::new();
        let matches = lexicon.find_matching_terms(
            "De verdachte werd na het verhoor in voorlopige hechtenis genomen.",
        );
        let strafrecht = matches.get(&LegalDomain::Strafrecht).unwrap();
        assert!(strafrecht.contains(&"verdachte"));
        assert!(strafrecht.contains(&"verhoor"));
        assert!(strafrecht.contains(&"voorlopige hechtenis"));
    }

    #[test]
    fn test_find_matching_terms_empty_for_plain_text() {
        let lexicon = LegalLexicon::new();
        let matches = lexicon.find_matching_terms("de kat zat op de mat");
        assert!(matches.is_empty());
    }
}
