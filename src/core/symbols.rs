//! Display glyphs for ISO 4217 currency codes.

/// Sorted by code so lookups can binary search.
const SYMBOLS: &[(&str, &str)] = &[
    ("AED", "د.إ"),
    ("AFN", "؋"),
    ("ALL", "Lek"),
    ("AMD", "֏"),
    ("ANG", "ƒ"),
    ("AOA", "Kz"),
    ("ARS", "$"),
    ("AUD", "A$"),
    ("AWG", "ƒ"),
    ("AZN", "₼"),
    ("BAM", "KM"),
    ("BBD", "$"),
    ("BDT", "৳"),
    ("BGN", "лв"),
    ("BHD", ".د.ب"),
    ("BIF", "FBu"),
    ("BMD", "$"),
    ("BND", "$"),
    ("BOB", "Bs."),
    ("BRL", "R$"),
    ("BSD", "$"),
    ("BTC", "₿"),
    ("BTN", "Nu."),
    ("BWP", "P"),
    ("BYN", "Br"),
    ("BZD", "BZ$"),
    ("CAD", "C$"),
    ("CDF", "FC"),
    ("CHF", "SFr."),
    ("CLF", "UF"),
    ("CLP", "$"),
    ("CNH", "¥"),
    ("CNY", "¥"),
    ("COP", "$"),
    ("CRC", "₡"),
    ("CUC", "$"),
    ("CUP", "$"),
    ("CVE", "$"),
    ("CZK", "Kč"),
    ("DJF", "Fdj"),
    ("DKK", "kr"),
    ("DOP", "RD$"),
    ("DZD", "دج"),
    ("EGP", "£"),
    ("ERN", "Nfk"),
    ("ETB", "Br"),
    ("EUR", "€"),
    ("FJD", "$"),
    ("FKP", "£"),
    ("GBP", "£"),
    ("GEL", "₾"),
    ("GGP", "£"),
    ("GHS", "₵"),
    ("GIP", "£"),
    ("GMD", "D"),
    ("GNF", "FG"),
    ("GTQ", "Q"),
    ("GYD", "$"),
    ("HKD", "HK$"),
    ("HNL", "L"),
    ("HRK", "kn"),
    ("HTG", "G"),
    ("HUF", "Ft"),
    ("IDR", "Rp"),
    ("ILS", "₪"),
    ("IMP", "£"),
    ("INR", "₹"),
    ("IQD", "ع.د"),
    ("IRR", "﷼"),
    ("ISK", "kr"),
    ("JEP", "£"),
    ("JMD", "J$"),
    ("JOD", "د.ا"),
    ("JPY", "¥"),
    ("KES", "KSh"),
    ("KGS", "сом"),
    ("KHR", "៛"),
    ("KMF", "CF"),
    ("KPW", "₩"),
    ("KRW", "₩"),
    ("KWD", "د.ك"),
    ("KYD", "$"),
    ("KZT", "₸"),
    ("LAK", "₭"),
    ("LBP", "ل.ل"),
    ("LKR", "Rs"),
    ("LRD", "$"),
    ("LSL", "L"),
    ("LYD", "ل.د"),
    ("MAD", "د.م."),
    ("MDL", "L"),
    ("MGA", "Ar"),
    ("MKD", "ден"),
    ("MMK", "Ks"),
    ("MNT", "₮"),
    ("MOP", "MOP$"),
    ("MRU", "UM"),
    ("MUR", "₨"),
    ("MVR", "Rf"),
    ("MWK", "MK"),
    ("MXN", "$"),
    ("MYR", "RM"),
    ("MZN", "MT"),
    ("NAD", "$"),
    ("NGN", "₦"),
    ("NIO", "C$"),
    ("NOK", "kr"),
    ("NPR", "₨"),
    ("NZD", "NZ$"),
    ("OMR", "ر.ع."),
    ("PAB", "B/."),
    ("PEN", "S/"),
    ("PGK", "K"),
    ("PHP", "₱"),
    ("PKR", "₨"),
    ("PLN", "zł"),
    ("PYG", "₲"),
    ("QAR", "ر.ق"),
    ("RON", "L"),
    ("RSD", "дин"),
    ("RUB", "₽"),
    ("RWF", "FRw"),
    ("SAR", "ر.س"),
    ("SBD", "$"),
    ("SCR", "₨"),
    ("SDG", "ج.س."),
    ("SEK", "kr"),
    ("SGD", "S$"),
    ("SHP", "£"),
    ("SLL", "Le"),
    ("SOS", "S"),
    ("SRD", "$"),
    ("SSP", "£"),
    ("STD", "Db"),
    ("STN", "Db"),
    ("SVC", "₡"),
    ("SYP", "£"),
    ("SZL", "E"),
    ("THB", "฿"),
    ("TJS", "ЅМ"),
    ("TMT", "m"),
    ("TND", "د.ت"),
    ("TOP", "T$"),
    ("TRY", "₺"),
    ("TTD", "$"),
    ("TWD", "NT$"),
    ("TZS", "TSh"),
    ("UAH", "₴"),
    ("UGX", "USh"),
    ("USD", "$"),
    ("UYU", "$"),
    ("UZS", "сўм"),
    ("VES", "Bs."),
    ("VND", "₫"),
    ("VUV", "VT"),
    ("WST", "T"),
    ("XAF", "FCFA"),
    ("XAG", "Ag"),
    ("XAU", "Au"),
    ("XCD", "$"),
    ("XDR", "SDR"),
    ("XOF", "CFA"),
    ("XPD", "Pd"),
    ("XPF", "₣"),
    ("XPT", "Pt"),
    ("YER", "﷼"),
    ("ZAR", "R"),
    ("ZMW", "ZK"),
    ("ZWL", "Z$"),
];

/// Returns the glyph for `code`, or an empty string when there is none.
pub fn symbol(code: &str) -> &'static str {
    let code = code.to_uppercase();
    SYMBOLS
        .binary_search_by(|(c, _)| (*c).cmp(code.as_str()))
        .map_or("", |i| SYMBOLS[i].1)
}
