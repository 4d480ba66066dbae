//! Format tampilan untuk harga dan kontak. Nilai kontak disimpan
//! sudah terformat; harga diformat di sisi baca.

pub const FREE_LABEL: &str = "Gratis";

const RANGE_SEPARATOR: &str = " - ";
const MAX_CONTACT_DIGITS: usize = 13;

/// "0" jadi "Gratis", selain itu "Rp. " dengan pemisah ribuan.
/// Input tanpa digit sama sekali (harga teks bebas warisan) lolos apa adanya.
pub fn format_currency(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return raw.trim().to_string();
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return FREE_LABEL.to_string();
    }
    let mut grouped = String::with_capacity(significant.len() + significant.len() / 3);
    for (i, c) in significant.chars().enumerate() {
        if i > 0 && (significant.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("Rp. {grouped}")
}

/// Menerima harga tunggal atau rentang "<min> - <max>". Rentang yang
/// kedua ujungnya gratis cukup ditulis "Gratis" sekali.
pub fn format_price(raw: &str) -> String {
    match raw.split_once(RANGE_SEPARATOR) {
        Some((min, max)) => {
            let min = format_currency(min);
            let max = format_currency(max);
            if min == FREE_LABEL && max == FREE_LABEL {
                FREE_LABEL.to_string()
            } else {
                format!("{min}{RANGE_SEPARATOR}{max}")
            }
        }
        None => format_currency(raw),
    }
}

/// Buang semua non-digit, potong ke 13 digit, sisipkan strip setelah
/// digit ke-4 dan ke-8. Input parsial diformat sebagian, tanpa validasi
/// nomor sungguhan.
pub fn format_contact(raw: &str) -> String {
    let mut out = String::new();
    for (i, c) in raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_CONTACT_DIGITS)
        .enumerate()
    {
        if i == 4 || i == 8 {
            out.push('-');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_free() {
        assert_eq!(format_currency("0"), "Gratis");
        assert_eq!(format_currency("000"), "Gratis");
    }

    #[test]
    fn thousands_are_dot_separated() {
        assert_eq!(format_currency("150000"), "Rp. 150.000");
        assert_eq!(format_currency("1500"), "Rp. 1.500");
        assert_eq!(format_currency("999"), "Rp. 999");
        assert_eq!(format_currency("12345678"), "Rp. 12.345.678");
    }

    #[test]
    fn non_digit_noise_is_stripped_before_formatting() {
        assert_eq!(format_currency("Rp 150.000"), "Rp. 150.000");
    }

    #[test]
    fn free_text_price_passes_through() {
        assert_eq!(format_currency("hubungi kami"), "hubungi kami");
    }

    #[test]
    fn range_formats_both_ends() {
        assert_eq!(format_price("10000 - 50000"), "Rp. 10.000 - Rp. 50.000");
    }

    #[test]
    fn all_free_range_collapses_to_single_gratis() {
        assert_eq!(format_price("0 - 0"), "Gratis");
    }

    #[test]
    fn half_free_range_keeps_both_sides() {
        assert_eq!(format_price("0 - 25000"), "Gratis - Rp. 25.000");
    }

    #[test]
    fn contact_gets_fixed_hyphen_positions() {
        assert_eq!(format_contact("081234567890"), "0812-3456-7890");
        assert_eq!(format_contact("0812345678901"), "0812-3456-78901");
    }

    #[test]
    fn contact_longer_than_13_digits_is_truncated() {
        assert_eq!(format_contact("08123456789012345"), "0812-3456-78901");
    }

    #[test]
    fn partial_contact_formats_partially() {
        assert_eq!(format_contact("0812"), "0812");
        assert_eq!(format_contact("081234"), "0812-34");
        assert_eq!(format_contact(""), "");
    }

    #[test]
    fn contact_ignores_existing_separators() {
        assert_eq!(format_contact("+62 812-3456-7890"), "6281-2345-67890");
    }
}
