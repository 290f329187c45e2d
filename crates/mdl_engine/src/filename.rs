use sha2::{Digest, Sha256};

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "md";

/// Stems longer than this are cut and tagged with a hash of the URL, keeping
/// the name under common 255-byte filesystem limits.
const MAX_STEM_BYTES: usize = 200;

/// Deterministic output name for a URL: scheme markers removed, `/ ? & =`
/// turned into `_`, `.md` appended. `https://a.com/b?c=d` -> `a.com_b_c_d.md`.
pub fn url_to_filename(url: &str) -> String {
    let stem: String = url
        .replace("https://", "")
        .replace("http://", "")
        .chars()
        .map(|c| match c {
            '/' | '?' | '&' | '=' => '_',
            '\\' | '\0'..='\u{1F}' => '_',
            c => c,
        })
        .collect();

    if stem.len() <= MAX_STEM_BYTES {
        return format!("{stem}.{OUTPUT_EXTENSION}");
    }

    let mut end = MAX_STEM_BYTES;
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}--{}.{OUTPUT_EXTENSION}", &stem[..end], short_hash(url))
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = String::with_capacity(8);
    for byte in digest.iter().take(4) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
