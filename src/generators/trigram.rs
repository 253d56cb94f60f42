// src/generators/trigram.rs
//
// Letter-trigram frequency statistics for pronounceable password generation,
// after the gpw generator by Tom Van Vleck. The table is built once from an
// embedded word corpus and never mutated afterwards.

use lazy_static::lazy_static;

pub const ALPHA: usize = 26;

lazy_static! {
    /// Process-wide, read-only trigram table.
    pub static ref TRIGRAMS: TrigramTable = TrigramTable::from_corpus(CORPUS);
}

/// Frequency of every three-letter sequence over the corpus, plus the grand
/// total used to weight the starting draw.
pub struct TrigramTable {
    freq: Box<[[[u16; ALPHA]; ALPHA]; ALPHA]>,
    pair_totals: Box<[[u32; ALPHA]; ALPHA]>,
    sigma: u32,
}

impl TrigramTable {
    fn from_corpus(corpus: &str) -> Self {
        let mut freq = Box::new([[[0u16; ALPHA]; ALPHA]; ALPHA]);
        for word in corpus.split_ascii_whitespace() {
            let letters: Vec<usize> = word
                .bytes()
                .filter(u8::is_ascii_lowercase)
                .map(|b| (b - b'a') as usize)
                .collect();
            for window in letters.windows(3) {
                freq[window[0]][window[1]][window[2]] += 1;
            }
        }

        let mut pair_totals = Box::new([[0u32; ALPHA]; ALPHA]);
        let mut sigma = 0u32;
        for a in 0..ALPHA {
            for b in 0..ALPHA {
                let total: u32 = freq[a][b].iter().map(|&f| u32::from(f)).sum();
                pair_totals[a][b] = total;
                sigma += total;
            }
        }

        Self {
            freq,
            pair_totals,
            sigma,
        }
    }

    /// Sum of all trigram frequencies.
    pub fn sigma(&self) -> u32 {
        self.sigma
    }

    /// Total frequency of all continuations of the letter pair `(a, b)`.
    /// Zero means the pair is a dead end.
    pub fn pair_total(&self, a: u8, b: u8) -> u32 {
        self.pair_totals[a as usize][b as usize]
    }

    /// Pick the starting three letters from a draw `r` in `[0, sigma)`.
    ///
    /// All 26^3 trigrams form one cumulative-frequency population; the draw
    /// lands in exactly one trigram's interval.
    pub fn seed_trigram(&self, r: u32) -> (u8, u8, u8) {
        let mut sum = 0u32;
        for a in 0..ALPHA {
            for b in 0..ALPHA {
                if sum + self.pair_totals[a][b] <= r {
                    // Whole pair lies below the draw; skip it in one step.
                    sum += self.pair_totals[a][b];
                    continue;
                }
                for c in 0..ALPHA {
                    sum += u32::from(self.freq[a][b][c]);
                    if sum > r {
                        return (a as u8, b as u8, c as u8);
                    }
                }
            }
        }
        // r < sigma, so the scan always lands inside an interval.
        unreachable!("seed draw outside trigram population")
    }

    /// Pick the next letter after the pair `(a, b)` from a draw `r` in
    /// `[0, pair_total(a, b))`.
    pub fn continuation(&self, a: u8, b: u8, r: u32) -> u8 {
        let row = &self.freq[a as usize][b as usize];
        let mut sum = 0u32;
        for (c, &f) in row.iter().enumerate() {
            sum += u32::from(f);
            if sum > r {
                return c as u8;
            }
        }
        unreachable!("continuation draw outside pair population")
    }
}

/// Embedded corpus the table is computed from: common English vocabulary,
/// lowercase, chosen for trigram coverage rather than meaning.
const CORPUS: &str = "\
    about above across action advance after again against almost alone along \
    already also although always among amount ancient animal another answer \
    anything appear around arrive article attack attempt attention autumn \
    balance battle beautiful because become before begin behind believe below \
    beside better between beyond bottle branch breath bright bring brother \
    brought building business butter camera capital captain careful carry \
    castle catch cattle center central century certain chance change chapter \
    character charge children choose church circle citizen claim clean clear \
    climb close clothes cloud coast collect college common company compare \
    complete condition consider contain continue control corner correct cotton \
    country course cover create creature crowd current custom danger daughter \
    decide declare degree deliver demand depend describe desert design desire \
    detail determine develop difference different difficult dinner direct \
    discover distance divide doctor dollar double doubt dream dress drink \
    drive during early earth either electric element elephant emerge employ \
    energy engine enough enter entire equal escape evening event every exact \
    example except exercise expect experience explain express extend familiar \
    family famous farther father feature fellow field fight figure final \
    finger finish flower follow forest forget fortune forward found fresh \
    friend further future garden gather general gentle glass golden govern \
    grand great green ground group grown guard happen happy hardly health \
    heard heart heavy height history hollow honor horse hotel hundred hunger \
    imagine important include increase indeed indicate industry inform insect \
    instead instrument interest island journey judge kitchen knowledge ladder \
    language large laugh leader learn least leather leave length letter level \
    light listen little local longer machine manner market master material \
    matter meadow measure member mention metal method middle might million \
    minute moment money month morning mother mountain mouth movement music \
    nation nature nearly neighbor neither never night north nothing notice \
    number object obtain ocean offer office often orange order other outside \
    paint paper paragraph parent particular party pattern people perhaps \
    period person picture piece place plain plane planet plant please pleasure \
    plenty point position possible pound power prepare present president \
    pretty probable problem process produce product promise proper protect \
    provide public purpose question quiet quite raise rather reach ready \
    reason receive record region remain remember repeat replace report \
    represent require respect rest result return rhythm river round saddle \
    salmon sample scale school science season second section sentence separate \
    serve settle seven several shadow share sharp shelter shine shore short \
    should shoulder shout shown signal silent silver similar simple since \
    single sister sleep slowly small smile soldier solution someone something \
    sound south space speak special spend spirit spread spring square stand \
    start station steel still stone store storm story straight strange stream \
    street stretch strike strong student study subject substance succeed \
    sudden suffer suggest summer supply support suppose surface surprise \
    sweet syllable symbol system table teacher temper terrible their there \
    thing think third those though thought thousand three through thunder \
    together tomorrow toward trade train travel trouble turtle twelve under \
    understand until usual valley value various village visit voice wagon \
    wander water weather welcome western whether which while whisper white \
    whole whose window winter wonder worker world would write written yellow \
    young";
