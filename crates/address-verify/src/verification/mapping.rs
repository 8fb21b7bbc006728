use super::normalizer::normalize_token;
use std::collections::HashMap;
use std::sync::OnceLock;

static STREET_TYPE_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();
static DIRECTIONAL_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();
static STATE_MAP: OnceLock<HashMap<String, &'static str>> = OnceLock::new();

/// Canonical USPS suffix abbreviation for a street type token.
pub(crate) fn street_type(token: &str) -> Option<&'static str> {
    street_type_map().get(&normalize_token(token)).copied()
}

/// Single or double letter directional (`N`, `SW`, ...).
pub(crate) fn directional(token: &str) -> Option<&'static str> {
    directional_map().get(&normalize_token(token)).copied()
}

/// Two letter postal code for a state, territory or military region.
pub(crate) fn state_code(value: &str) -> Option<&'static str> {
    state_map().get(&normalize_token(value)).copied()
}

fn build(entries: &[(&str, &'static str)]) -> HashMap<String, &'static str> {
    let mut map = HashMap::with_capacity(entries.len() * 2);
    for (name, code) in entries {
        map.insert(normalize_token(name), *code);
        map.insert(normalize_token(code), *code);
    }
    map
}

fn street_type_map() -> &'static HashMap<String, &'static str> {
    STREET_TYPE_MAP.get_or_init(|| {
        const TYPES: &[(&str, &str)] = &[
            ("Alley", "Aly"),
            ("Allee", "Aly"),
            ("Annex", "Anx"),
            ("Arcade", "Arc"),
            ("Avenue", "Ave"),
            ("Av", "Ave"),
            ("Aven", "Ave"),
            ("Avn", "Ave"),
            ("Bayou", "Byu"),
            ("Beach", "Bch"),
            ("Bend", "Bnd"),
            ("Bluff", "Blf"),
            ("Boulevard", "Blvd"),
            ("Boul", "Blvd"),
            ("Branch", "Br"),
            ("Bridge", "Brg"),
            ("Brook", "Brk"),
            ("Bypass", "Byp"),
            ("Causeway", "Cswy"),
            ("Center", "Ctr"),
            ("Centre", "Ctr"),
            ("Circle", "Cir"),
            ("Circ", "Cir"),
            ("Cliff", "Clf"),
            ("Club", "Clb"),
            ("Common", "Cmn"),
            ("Corner", "Cor"),
            ("Course", "Crse"),
            ("Court", "Ct"),
            ("Cove", "Cv"),
            ("Creek", "Crk"),
            ("Crescent", "Cres"),
            ("Crossing", "Xing"),
            ("Drive", "Dr"),
            ("Drv", "Dr"),
            ("Estate", "Est"),
            ("Estates", "Ests"),
            ("Expressway", "Expy"),
            ("Extension", "Ext"),
            ("Falls", "Fls"),
            ("Ferry", "Fry"),
            ("Field", "Fld"),
            ("Fields", "Flds"),
            ("Flat", "Flt"),
            ("Ford", "Frd"),
            ("Forest", "Frst"),
            ("Fork", "Frk"),
            ("Fort", "Ft"),
            ("Freeway", "Fwy"),
            ("Garden", "Gdn"),
            ("Gardens", "Gdns"),
            ("Gateway", "Gtwy"),
            ("Glen", "Gln"),
            ("Green", "Grn"),
            ("Grove", "Grv"),
            ("Harbor", "Hbr"),
            ("Haven", "Hvn"),
            ("Heights", "Hts"),
            ("Highway", "Hwy"),
            ("Hill", "Hl"),
            ("Hills", "Hls"),
            ("Hollow", "Holw"),
            ("Island", "Is"),
            ("Junction", "Jct"),
            ("Key", "Ky"),
            ("Knoll", "Knl"),
            ("Lake", "Lk"),
            ("Landing", "Lndg"),
            ("Lane", "Ln"),
            ("Loop", "Loop"),
            ("Mall", "Mall"),
            ("Manor", "Mnr"),
            ("Meadow", "Mdw"),
            ("Meadows", "Mdws"),
            ("Mill", "Ml"),
            ("Motorway", "Mtwy"),
            ("Mount", "Mt"),
            ("Mountain", "Mtn"),
            ("Orchard", "Orch"),
            ("Oval", "Oval"),
            ("Park", "Park"),
            ("Parkway", "Pkwy"),
            ("Pass", "Pass"),
            ("Path", "Path"),
            ("Pike", "Pike"),
            ("Pine", "Pne"),
            ("Place", "Pl"),
            ("Plain", "Pln"),
            ("Plaza", "Plz"),
            ("Point", "Pt"),
            ("Port", "Prt"),
            ("Prairie", "Pr"),
            ("Ranch", "Rnch"),
            ("Ridge", "Rdg"),
            ("River", "Riv"),
            ("Road", "Rd"),
            ("Route", "Rte"),
            ("Row", "Row"),
            ("Run", "Run"),
            ("Shore", "Shr"),
            ("Skyway", "Skwy"),
            ("Spring", "Spg"),
            ("Springs", "Spgs"),
            ("Square", "Sq"),
            ("Station", "Sta"),
            ("Street", "St"),
            ("Str", "St"),
            ("Strt", "St"),
            ("Summit", "Smt"),
            ("Terrace", "Ter"),
            ("Trace", "Trce"),
            ("Trail", "Trl"),
            ("Tunnel", "Tunl"),
            ("Turnpike", "Tpke"),
            ("Valley", "Vly"),
            ("Via", "Via"),
            ("View", "Vw"),
            ("Village", "Vlg"),
            ("Vista", "Vis"),
            ("Walk", "Walk"),
            ("Way", "Way"),
            ("Well", "Wl"),
            ("Wells", "Wls"),
        ];
        build(TYPES)
    })
}

fn directional_map() -> &'static HashMap<String, &'static str> {
    DIRECTIONAL_MAP.get_or_init(|| {
        const DIRECTIONS: &[(&str, &str)] = &[
            ("North", "N"),
            ("South", "S"),
            ("East", "E"),
            ("West", "W"),
            ("Northeast", "NE"),
            ("Northwest", "NW"),
            ("Southeast", "SE"),
            ("Southwest", "SW"),
        ];
        build(DIRECTIONS)
    })
}

fn state_map() -> &'static HashMap<String, &'static str> {
    STATE_MAP.get_or_init(|| {
        const STATES: &[(&str, &str)] = &[
            ("Alabama", "AL"),
            ("Alaska", "AK"),
            ("American Samoa", "AS"),
            ("Arizona", "AZ"),
            ("Arkansas", "AR"),
            ("California", "CA"),
            ("Colorado", "CO"),
            ("Connecticut", "CT"),
            ("Delaware", "DE"),
            ("District of Columbia", "DC"),
            ("Federated States of Micronesia", "FM"),
            ("Florida", "FL"),
            ("Georgia", "GA"),
            ("Guam", "GU"),
            ("Hawaii", "HI"),
            ("Idaho", "ID"),
            ("Illinois", "IL"),
            ("Indiana", "IN"),
            ("Iowa", "IA"),
            ("Kansas", "KS"),
            ("Kentucky", "KY"),
            ("Louisiana", "LA"),
            ("Maine", "ME"),
            ("Marshall Islands", "MH"),
            ("Maryland", "MD"),
            ("Massachusetts", "MA"),
            ("Michigan", "MI"),
            ("Minnesota", "MN"),
            ("Mississippi", "MS"),
            ("Missouri", "MO"),
            ("Montana", "MT"),
            ("Nebraska", "NE"),
            ("Nevada", "NV"),
            ("New Hampshire", "NH"),
            ("New Jersey", "NJ"),
            ("New Mexico", "NM"),
            ("New York", "NY"),
            ("North Carolina", "NC"),
            ("North Dakota", "ND"),
            ("Northern Mariana Islands", "MP"),
            ("Ohio", "OH"),
            ("Oklahoma", "OK"),
            ("Oregon", "OR"),
            ("Palau", "PW"),
            ("Pennsylvania", "PA"),
            ("Puerto Rico", "PR"),
            ("Rhode Island", "RI"),
            ("South Carolina", "SC"),
            ("South Dakota", "SD"),
            ("Tennessee", "TN"),
            ("Texas", "TX"),
            ("Utah", "UT"),
            ("Vermont", "VT"),
            ("Virgin Islands", "VI"),
            ("Virginia", "VA"),
            ("Washington", "WA"),
            ("West Virginia", "WV"),
            ("Wisconsin", "WI"),
            ("Wyoming", "WY"),
            ("Armed Forces Americas", "AA"),
            ("Armed Forces Europe", "AE"),
            ("Armed Forces Pacific", "AP"),
        ];
        build(STATES)
    })
}
