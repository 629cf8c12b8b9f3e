use crate::models::question::{Category, Question};
use crate::models::session::Difficulty;
use crate::services::question_bank::QuestionBank;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Categories asked at the easy tier, in interview order.
pub const EASY_CATEGORIES: [Category; 4] = [
    Category::PurposeOfStudy,
    Category::AcademicBackground,
    Category::UniversityChoice,
    Category::PostGraduationPlans,
];

const HARD_PER_CATEGORY: usize = 2;

/// Builds the fixed question sequence for a new session.
///
/// Texts are never repeated within one sequence. A category that cannot
/// supply its quota contributes what it has; no other category backfills.
pub fn select_questions<R: Rng + ?Sized>(
    bank: &QuestionBank,
    level: Difficulty,
    rng: &mut R,
) -> Vec<Question> {
    let mut picker = Picker::new(bank);

    match level {
        Difficulty::Easy => {
            for category in EASY_CATEGORIES {
                picker.take(category, 1, rng);
            }
        }
        Difficulty::Medium => {
            for category in Category::ALL {
                picker.take(category, 1, rng);
            }
            if let Some(extra) = Category::ALL.choose(rng) {
                if picker.take(*extra, 1, rng) == 0 {
                    tracing::debug!(category = %extra, "Extra medium question exhausted");
                }
            }
        }
        Difficulty::Hard | Difficulty::Default => {
            for category in Category::ALL {
                let taken = picker.take(category, HARD_PER_CATEGORY, rng);
                if taken < HARD_PER_CATEGORY {
                    tracing::debug!(
                        category = %category,
                        taken,
                        "Category under-filled for hard tier"
                    );
                }
            }
        }
    }

    picker.selected
}

struct Picker<'a> {
    bank: &'a QuestionBank,
    seen: HashSet<&'a str>,
    selected: Vec<Question>,
}

impl<'a> Picker<'a> {
    fn new(bank: &'a QuestionBank) -> Self {
        Self {
            bank,
            seen: HashSet::new(),
            selected: Vec::new(),
        }
    }

    /// Shuffles the unused texts of `category` and appends up to `count`.
    fn take<R: Rng + ?Sized>(&mut self, category: Category, count: usize, rng: &mut R) -> usize {
        let bank = self.bank;
        let mut available: Vec<&'a str> = bank
            .questions(category)
            .iter()
            .map(String::as_str)
            .filter(|q| !self.seen.contains(q))
            .collect();
        available.shuffle(rng);

        let mut taken = 0;
        for text in available {
            if taken == count {
                break;
            }
            // the bank itself may list a text twice
            if !self.seen.insert(text) {
                continue;
            }
            let position = self.selected.len() + 1;
            self.selected
                .push(Question::at_position(position, category, text));
            taken += 1;
        }
        taken
    }
}
