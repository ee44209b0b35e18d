// 🔤 Romanization - name → uppercase Latin syllables
// Pluggable: the lookup store only sees the trait

use pinyin::ToPinyin;

/// Strategy for deriving a romanized name when none is on file
pub trait Romanizer: Send + Sync {
    fn romanize(&self, name: &str) -> String;
}

/// Mandarin pinyin without tones, one syllable per Han character
///
/// Characters without a reading (Latin, digits, punctuation) are kept as
/// uppercase runs. Whitespace only separates segments.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinRomanizer;

impl Romanizer for PinyinRomanizer {
    fn romanize(&self, name: &str) -> String {
        let mut segments: Vec<String> = Vec::new();
        let mut run = String::new();

        for ch in name.chars() {
            if let Some(reading) = ch.to_pinyin() {
                flush(&mut run, &mut segments);
                segments.push(reading.plain().replace('ü', "v").to_uppercase());
            } else if ch.is_whitespace() {
                flush(&mut run, &mut segments);
            } else {
                run.push(ch);
            }
        }
        flush(&mut run, &mut segments);

        segments.join(" ")
    }
}

fn flush(run: &mut String, segments: &mut Vec<String>) {
    if !run.is_empty() {
        segments.push(run.to_uppercase());
        run.clear();
    }
}

impl<F> Romanizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn romanize(&self, name: &str) -> String {
        self(name)
    }
}
