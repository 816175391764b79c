//! A1-style cell addressing.

/// 0-indexed column number to spreadsheet letters: 0 → "A", 25 → "Z", 26 → "AA".
pub fn column_letters(col: u32) -> String {
    let mut out = Vec::new();
    let mut n = col;
    loop {
        out.push(b'A' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// 0-indexed (row, col) to a 1-indexed A1 reference: (0, 0) → "A1".
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_letters(col), row + 1)
}

/// Parse an A1 reference back to 0-indexed (row, col). Absolute markers (`$`)
/// are rejected; exports never produce them.
pub fn parse_cell_ref(a1: &str) -> Option<(u32, u32)> {
    let split = a1.find(|ch: char| ch.is_ascii_digit())?;
    let (letters, digits) = a1.split_at(split);
    if letters.is_empty() || !letters.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    let mut col: u32 = 0;
    for b in letters.bytes() {
        col = col.checked_mul(26)?.checked_add((b - b'A') as u32 + 1)?;
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}
