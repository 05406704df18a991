use {
    std::collections::HashMap,
    image::{Rgba, RgbaImage},
    rand::{Rng, SeedableRng},
    rand_xoshiro::Xoshiro256PlusPlus,
    tracing::debug,
    crate::render::glyphs::{is_renderable, Mask, GLYPH_SIZE},
};

const BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const SEED: u64 = 0x5eed_c10d;
const RELATIVE_SCALING: f64 = 0.5;
const PREFER_HORIZONTAL: f64 = 0.9;
const PADDING: u32 = 2;

// viridis, dark end dropped so words stay readable on white
const PALETTE: [[u8; 3]; 8] = [
    [0x46, 0x32, 0x7e],
    [0x36, 0x5c, 0x8d],
    [0x27, 0x7f, 0x8e],
    [0x1f, 0xa1, 0x87],
    [0x4a, 0xc1, 0x6d],
    [0x9f, 0xda, 0x3a],
    [0x3b, 0x52, 0x8b],
    [0x21, 0x91, 0x8c],
];

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between",
    "both", "but", "by", "can", "can't", "cannot", "com", "could", "couldn't", "did", "didn't",
    "do", "does", "doesn't", "doing", "don't", "down", "during", "each", "else", "ever", "few",
    "for", "from", "further", "get", "had", "hadn't", "has", "hasn't", "have", "haven't", "having",
    "he", "he'd", "he'll", "he's", "hence", "her", "here", "here's", "hers", "herself", "him",
    "himself", "his", "how", "how's", "however", "http", "i", "i'd", "i'll", "i'm", "i've", "if",
    "in", "into", "is", "isn't", "it", "it's", "its", "itself", "just", "k", "let's", "like", "me",
    "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off", "on", "once",
    "only", "or", "other", "otherwise", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "r", "same", "shall", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't",
    "since", "so", "some", "such", "than", "that", "that's", "the", "their", "theirs", "them",
    "themselves", "then", "there", "there's", "therefore", "these", "they", "they'd", "they'll",
    "they're", "they've", "this", "those", "through", "to", "too", "under", "until", "up", "very",
    "was", "wasn't", "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's",
    "when", "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "www", "you", "you'd", "you'll", "you're", "you've",
    "your", "yours", "yourself", "yourselves",
];

#[derive(Debug, Clone)]
pub struct WordCloudOptions {
    pub width: u32,
    pub height: u32,
    pub max_words: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub x: u32,
    pub y: u32,
    pub scale: u32,
    pub vertical: bool,
}

/// Summed-area table over occupied pixels, for constant time collision checks.
struct Occupancy {
    width: u32,
    height: u32,
    filled: Vec<bool>,
    sums: Vec<u32>,
}

impl Default for WordCloudOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            max_words: 200,
        }
    }
}

/// Word frequencies sorted by decreasing count, ties broken alphabetically.
///
/// Words are compared case-insensitively and shown in their most frequent
/// spelling. A trailing `'s` is dropped, and a plural collapses into its
/// singular when both occur.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<(String, usize)> {
    let mut spellings: HashMap<String, HashMap<String, usize>> = HashMap::new();

    for token in tokenize(text) {
        spellings.entry(token.to_lowercase())
            .or_default()
            .entry(token)
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    let plurals: Vec<String> = spellings.keys()
        .filter(|key| key.ends_with('s') && !key.ends_with("ss") && spellings.contains_key(&key[..key.len() - 1]))
        .cloned()
        .collect();
    for plural in plurals {
        if let Some(forms) = spellings.remove(&plural) {
            let singular = spellings.entry(plural[..plural.len() - 1].to_owned()).or_default();
            let total: usize = forms.values().sum();
            if let Some(best) = singular.values_mut().max() {
                *best += total;
            }
        }
    }

    let mut frequencies: Vec<(String, usize)> = spellings.into_values()
        .filter_map(|forms| {
            let total = forms.values().sum();
            forms.into_iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
                .map(|(spelling, _)| (spelling, total))
        })
        .collect();

    frequencies.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequencies.truncate(max_words);
    frequencies
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|token| token.trim_matches('\''))
        .map(|token| token.strip_suffix("'s").unwrap_or(token))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !token.chars().all(|c| c.is_numeric()))
        .filter(|token| !STOPWORDS.contains(&token.to_lowercase().as_str()))
        .filter(|token| is_renderable(token))
        .map(|token| token.to_owned())
}

/// Places words largest first, walking an elliptic spiral out from the
/// centre; a word that fits nowhere is retried one size smaller until it
/// drops below the minimum size.
pub fn layout(frequencies: &[(String, usize)], options: &WordCloudOptions, rng: &mut Xoshiro256PlusPlus) -> Vec<PlacedWord> {
    let max_count = match frequencies.first() {
        Some((_, count)) => *count as f64,
        None => return Vec::new(),
    };
    let max_scale = (options.height / (GLYPH_SIZE * 4)).max(1);
    let mut occupancy = Occupancy::new(options.width, options.height);
    let mut placed = Vec::new();

    for (word, count) in frequencies {
        let relative = *count as f64 / max_count;
        let mut scale = ((max_scale as f64) * (RELATIVE_SCALING * relative + (1.0 - RELATIVE_SCALING))).round().max(1.0) as u32;
        let vertical = rng.gen_bool(1.0 - PREFER_HORIZONTAL);

        loop {
            let mask = Mask::from_text(word, scale);
            let mask = if vertical { mask.rotated() } else { mask };

            if let Some((x, y)) = find_position(&occupancy, &mask) {
                occupancy.fill(x, y, mask.width() + PADDING, mask.height() + PADDING);
                placed.push(PlacedWord {
                    word: word.clone(),
                    x,
                    y,
                    scale,
                    vertical,
                });
                break;
            }

            if scale == 1 {
                debug!("no room left for {}", word);
                break;
            }
            scale -= 1;
        }
    }

    placed
}

fn find_position(occupancy: &Occupancy, mask: &Mask) -> Option<(u32, u32)> {
    let width = mask.width() + PADDING;
    let height = mask.height() + PADDING;
    if width > occupancy.width || height > occupancy.height {
        return None;
    }

    let center_x = (occupancy.width - width) as f64 / 2.0;
    let center_y = (occupancy.height - height) as f64 / 2.0;
    let aspect = occupancy.height as f64 / occupancy.width as f64;
    let max_radius = (occupancy.width as f64).hypot(occupancy.height as f64);

    let mut t = 0.0f64;
    while t * 2.0 < max_radius {
        let x = center_x + t * 2.0 * t.cos();
        let y = center_y + t * 2.0 * aspect * t.sin();
        t += 0.1;

        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        if x + width <= occupancy.width && y + height <= occupancy.height && occupancy.is_free(x, y, width, height) {
            return Some((x, y));
        }
    }

    None
}

pub fn word_cloud_image(texts: &[String], options: &WordCloudOptions) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(options.width, options.height, BACKGROUND);
    let frequencies = word_frequencies(&texts.join(" "), options.max_words);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(SEED);

    for word in layout(&frequencies, options, &mut rng) {
        let mask = Mask::from_text(&word.word, word.scale);
        let mask = if word.vertical { mask.rotated() } else { mask };
        let [r, g, b] = PALETTE[rng.gen_range(0..PALETTE.len())];
        mask.draw(&mut image, word.x as i64, word.y as i64, Rgba([r, g, b, 0xff]));
    }

    image
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filled: vec![false; (width * height) as usize],
            sums: vec![0; ((width + 1) * (height + 1)) as usize],
        }
    }

    fn is_free(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        let stride = self.width + 1;
        let at = |x: u32, y: u32| self.sums[(y * stride + x) as usize];
        let (x2, y2) = (x + width, y + height);
        at(x2, y2) + at(x, y) == at(x2, y) + at(x, y2)
    }

    fn fill(&mut self, x: u32, y: u32, width: u32, height: u32) {
        for py in y..(y + height).min(self.height) {
            for px in x..(x + width).min(self.width) {
                self.filled[(py * self.width + px) as usize] = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let stride = self.width + 1;
        for y in 0..self.height {
            let mut row = 0;
            for x in 0..self.width {
                row += self.filled[(y * self.width + x) as usize] as u32;
                let above = self.sums[(y * stride + x + 1) as usize];
                self.sums[((y + 1) * stride + x + 1) as usize] = above + row;
            }
        }
    }
}
