//! # BOM Tide Station Catalog
//!
//! Every tide prediction station published on the Bureau of Meteorology
//! tide-table print page, keyed by its AAC code. The catalog is immutable:
//! distances to a reference point are computed by [`crate::geo`] and kept in a
//! separate [`crate::geo::ResolvedStation`] record, never written back here.

use serde::Serialize;

/// A tide prediction station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Station {
    /// AAC code used in the print page URL (e.g. `NSW_TP007`)
    pub id: &'static str,
    /// Latitude in decimal degrees (negative south)
    pub latitude: f64,
    /// Longitude in decimal degrees (positive east)
    pub longitude: f64,
    /// Display name shown in the `location` attribute
    pub name: &'static str,
}

impl Station {
    /// `(latitude, longitude)` pair as used by [`crate::geo::haversine_km`].
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

const fn station(id: &'static str, latitude: f64, longitude: f64, name: &'static str) -> Station {
    Station {
        id,
        latitude,
        longitude,
        name,
    }
}

/// All supported stations, in BOM order (state, then AAC number).
///
/// Order matters: nearest-station ties resolve to the first entry.
pub static CATALOG: &[Station] = &[
    station("NSW_TP001", -33.9666666666667, 151.216666666667, "Botany Bay"),
    station("NSW_TP002", -37.0666666666667, 149.9, "Eden"),
    station("NSW_TP003", -31.5166666666667, 159.05, "Lord Howe Island"),
    station("NSW_TP004", -32.9166666666667, 151.783333333333, "Newcastle"),
    station("NSW_TP005", -29.0666666666667, 167.95, "Norfolk Island"),
    station("NSW_TP006", -34.4833333333333, 150.916666666667, "Port Kembla"),
    station("NSW_TP007", -33.85, 151.233333333333, "Sydney (Fort Denison)"),
    station("NSW_TP008", -29.4333333333333, 153.366666666667, "Yamba"),
    station("NT_TP001", -12.4666666666667, 130.85, "Darwin"),
    station("NT_TP002", -12.2, 136.666666666667, "Melville Bay (Gove Harbour)"),
    station("NT_TP003", -13.8666666666667, 136.416666666667, "Milner Bay (Groote Eylandt)"),
    station("NT_TP014", -15.75, 136.816666666667, "Centre Island"),
    station("NT_TP036", -12.3333333333333, 130.7, "Charles Point Patches"),
    station("QLD_TP001", -19.85, 148.116666666667, "Abbot Point"),
    station("QLD_TP002", -20.0166666666667, 148.25, "Bowen"),
    station("QLD_TP003", -27.3666666666667, 153.166666666667, "Brisbane Bar"),
    station("QLD_TP004", -20.0833333333333, 150.3, "Bugatti Reef"),
    station("QLD_TP005", -24.7666666666667, 152.383333333333, "Bundaberg (Burnett Heads)"),
    station("QLD_TP006", -16.9333333333333, 145.783333333333, "Cairns"),
    station("QLD_TP008", -23.8333333333333, 151.25, "Gladstone"),
    station("QLD_TP009", -27.9666666666667, 153.416666666667, "Gold Coast Operations Base"),
    station("QLD_TP011", -27.95, 153.416666666667, "Gold Coast Seaway"),
    station("QLD_TP012", -21.2666666666667, 149.3, "Hay Point"),
    station("QLD_TP013", -17.5, 140.833333333333, "Karumba"),
    station("QLD_TP014", -14.5333333333333, 144.85, "Leggatt Island"),
    station("QLD_TP017", -18.5166666666667, 146.383333333333, "Lucinda (Offshore)"),
    station("QLD_TP018", -21.1166666666667, 149.233333333333, "Mackay Outer Harbour"),
    station("QLD_TP019", -26.6833333333333, 153.116666666667, "Mooloolaba"),
    station("QLD_TP020", -17.6, 146.116666666667, "Mourilyan Harbour"),
    station("QLD_TP021", -26.3833333333333, 153.1, "Noosa Head"),
    station("QLD_TP022", -23.5833333333333, 150.866666666667, "Port Alma"),
    station("QLD_TP023", -16.4833333333333, 145.466666666667, "Port Douglas"),
    station("QLD_TP024", -23.1666666666667, 150.8, "Rosslyn Bay"),
    station("QLD_TP025", -20.2833333333333, 148.783333333333, "Shute Harbour"),
    station("QLD_TP026", -10.6, 141.916666666667, "Booby Island"),
    station("QLD_TP027", -10.5666666666667, 142.15, "Goods Island"),
    station("QLD_TP030", -10.5833333333333, 142.216666666667, "Thursday Island"),
    station("QLD_TP032", -10.45, 142.45, "Twin Island"),
    station("QLD_TP033", -19.25, 146.833333333333, "Townsville"),
    station("QLD_TP034", -25.3, 152.9, "Urangan"),
    station("QLD_TP035", -24.9666666666667, 153.35, "Waddy Point (Fraser Island)"),
    station("QLD_TP036", -12.6666666666667, 141.866666666667, "Weipa (Humbug Point)"),
    station("QLD_TP104", -27.35, 153.1, "Serpentine Creek"),
    station("QLD_TP135", -18.25, 146.033333333333, "Cardwell"),
    station("QLD_TP138", -27.4666666666667, 153.033333333333, "Brisbane Port Office"),
    station("QLD_TP147", -27.0833333333333, 153.15, "Bribie I., Bongaree"),
    station("QLD_TP148", -27.0833333333333, 153.3, "Bn M2, Moreton Bay"),
    station("QLD_TP149", -27.1833333333333, 153.366666666667, "Tangalooma Point"),
    station("SA_TP001", -34.7833333333333, 138.483333333333, "Port Adelaide (Outer Harbor)"),
    station("SA_TP002", -35.0166666666667, 137.766666666667, "Port Giles"),
    station("SA_TP003", -34.7166666666667, 135.866666666667, "Port Lincoln"),
    station("SA_TP004", -33.1833333333333, 138.016666666667, "Port Pirie"),
    station("SA_TP005", -32.15, 133.633333333333, "Thevenard"),
    station("SA_TP006", -35.5666666666667, 138.633333333333, "Victor Harbor"),
    station("SA_TP007", -33.9333333333333, 137.616666666667, "Wallaroo"),
    station("SA_TP008", -33.0166666666667, 137.583333333333, "Whyalla"),
    station("TAS_TP001", -41.05, 145.916666666667, "Burnie"),
    station("TAS_TP003", -42.8833333333333, 147.333333333333, "Hobart"),
    station("TAS_TP004", -41.0666666666667, 146.8, "Low Head"),
    station("TAS_TP005", -41.15, 146.383333333333, "Devonport"),
    station("TAS_TP007", -42.55, 147.933333333333, "Spring Bay"),
    station("TAS_TP008", -40.7666666666667, 145.3, "Stanley"),
    station("VIC_TP001", -37.8833333333333, 147.966666666667, "Lakes Entrance (Outer)"),
    station("VIC_TP002", -38.55, 143.983333333333, "Lorne"),
    station("VIC_TP003", -37.8666666666667, 144.916666666667, "Melbourne (Williamstown)"),
    station("VIC_TP004", -38.1, 144.65, "Corio Bay"),
    station("VIC_TP005", -38.15, 144.366666666667, "Geelong"),
    station("VIC_TP006", -38.3333333333333, 144.9, "Hovell Pile"),
    station("VIC_TP007", -38.2666666666667, 144.666666666667, "Queenscliff"),
    station("VIC_TP008", -38.2, 144.75, "West Channel Pile"),
    station("VIC_TP009", -38.3, 144.616666666667, "Point Lonsdale"),
    station("VIC_TP010", -38.7, 146.466666666667, "Port Welshpool Pier"),
    station("VIC_TP011", -38.35, 141.616666666667, "Portland"),
    station("VIC_TP012", -38.9166666666667, 146.516666666667, "Rabbit Island"),
    station("VIC_TP013", -38.3666666666667, 145.216666666667, "Western Port (Stony Point)"),
    station("WA_TP001", -35.0333333333333, 117.9, "Albany"),
    station("WA_TP002", -20.8166666666667, 115.55, "Barrow Island (Tanker Mooring)"),
    station("WA_TP003", -20.7333333333333, 115.466666666667, "Barrow Island (Wapet Landing)"),
    station("WA_TP004", -18.0, 122.216666666667, "Broome"),
    station("WA_TP005", -33.3166666666667, 115.666666666667, "Bunbury"),
    station("WA_TP007", -14.25, 125.6, "Cape Voltaire (Krait Bay)"),
    station("WA_TP008", -24.9, 113.65, "Carnarvon"),
    station("WA_TP009", -10.4333333333333, 105.666666666667, "Christmas Island"),
    station("WA_TP011", -20.6166666666667, 116.75, "Dampier (King Bay)"),
    station("WA_TP012", -25.9333333333333, 113.533333333333, "Denham"),
    station("WA_TP013", -33.8666666666667, 121.9, "Esperance"),
    station("WA_TP014", -21.95, 114.133333333333, "Exmouth"),
    station("WA_TP015", -32.05, 115.733333333333, "Fremantle"),
    station("WA_TP016", -28.7833333333333, 114.6, "Geraldton"),
    station("WA_TP018", -21.65, 115.133333333333, "Onslow (Beadon Creek)"),
    station("WA_TP020", -20.3166666666667, 118.566666666667, "Port Hedland"),
    station("WA_TP021", -20.5833333333333, 117.183333333333, "Port Walcott (Cape Lambert)"),
    station("WA_TP022", -21.4666666666667, 115.016666666667, "Thevenard Island"),
    station("WA_TP023", -15.45, 128.1, "Wyndham"),
    station("WA_TP024", -16.1333333333333, 123.733333333333, "Yampi Sound (Koolan Island)"),
    station("WA_TP025", -21.65, 115.016666666667, "Ashburton North"),
    station("WA_TP032", -14.8333333333333, 128.3, "Cape Domett"),
    station("WA_TP043", -17.3, 123.6, "Derby"),
];

/// Look up a station by AAC code.
pub fn find(id: &str) -> Option<&'static Station> {
    CATALOG.iter().find(|station| station.id == id)
}
