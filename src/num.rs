/// Insert a '_' between each 3-digit group, counting from the right.
fn group_digits(digits: String) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}

/// Format number in Rust style, padded to the full u64 width of 20 digits:
/// `00_000_000_000_001_200_000`.
pub(crate) fn format_pad_u64(n: u64) -> String {
    group_digits(format!("{:020}", n))
}

/// Format number in Rust style, padded to at least 9 digits: `001_200_000`.
pub(crate) fn format_pad9_u64(n: u64) -> String {
    group_digits(format!("{:09}", n))
}
