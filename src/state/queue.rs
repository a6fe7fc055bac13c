use chrono::{DateTime, Local};
use rand::Rng;

/// No I or O, so codes can't be misread as 1 or 0.
const LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
/// No 0 or 1, for the same reason.
const DIGITS: &[u8] = b"23456789";

/// A walk-up queue ticket such as `KM-384`. Lives until the next one is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueTicket {
    pub code: String,
    pub issued_at: DateTime<Local>,
    /// Game the visitor asked for, when the ticket came from a "Book" action.
    pub game: Option<String>,
}

impl QueueTicket {
    pub fn generate(rng: &mut impl Rng, issued_at: DateTime<Local>, game: Option<String>) -> Self {
        let mut code = String::with_capacity(6);
        for _ in 0..2 {
            code.push(LETTERS[rng.gen_range(0..LETTERS.len())] as char);
        }
        code.push('-');
        for _ in 0..3 {
            code.push(DIGITS[rng.gen_range(0..DIGITS.len())] as char);
        }
        Self { code, issued_at, game }
    }

    pub fn issued_label(&self) -> String {
        self.issued_at.format("%b %-d, %-I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn is_valid(code: &str) -> bool {
        let bytes = code.as_bytes();
        bytes.len() == 6
            && LETTERS.contains(&bytes[0])
            && LETTERS.contains(&bytes[1])
            && bytes[2] == b'-'
            && bytes[3..].iter().all(|b| DIGITS.contains(b))
    }

    #[test]
    fn codes_use_reduced_alphabets() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let ticket = QueueTicket::generate(&mut rng, Local::now(), None);
            assert!(is_valid(&ticket.code), "bad code {}", ticket.code);
            assert!(!ticket.code.contains(['I', 'O', '0', '1']));
        }
    }

    #[test]
    fn same_seed_same_code() {
        let now = Local::now();
        let a = QueueTicket::generate(&mut StdRng::seed_from_u64(42), now, None);
        let b = QueueTicket::generate(&mut StdRng::seed_from_u64(42), now, None);
        assert_eq!(a, b);
    }

    #[test]
    fn remembers_the_booked_game() {
        let ticket = QueueTicket::generate(&mut rand::thread_rng(), Local::now(), Some("Tetris".into()));
        assert_eq!(ticket.game.as_deref(), Some("Tetris"));
    }
}
