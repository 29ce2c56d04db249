use crate::error::SessionError;
use crate::model::{MarkingScheme, Question, Section, Subject, TemplateQuestion, TestTemplate};
use rand::seq::SliceRandom;
use rand::Rng;

fn stamp(
    q: &TemplateQuestion,
    section: &Section,
    section_index: usize,
    scheme: &MarkingScheme,
) -> Question {
    Question {
        id: q.id.clone(),
        text: q.text.clone(),
        options: q.options.clone(),
        correct_answer_index: q.correct_answer_index,
        explanation: q.explanation.clone(),
        subject_id: section.subject_id.clone().unwrap_or_default(),
        subject_name: section
            .subject_name
            .clone()
            .unwrap_or_else(|| section.title.clone()),
        section_title: section.title.clone(),
        section_index,
        marks_on_correct: scheme.marks_per_correct,
        marks_lost_on_incorrect: scheme.marks_lost_per_incorrect,
    }
}

/// Flattens a template into a de-sectioned candidate pool, each question
/// stamped with its origin and the mode's marking arithmetic.
pub fn build_pool(
    test: &TestTemplate,
    scheme: &MarkingScheme,
) -> Result<Vec<Question>, SessionError> {
    let pool: Vec<Question> = test
        .sections
        .iter()
        .enumerate()
        .flat_map(|(si, section)| {
            section
                .questions
                .iter()
                .map(move |q| stamp(q, section, si, scheme))
        })
        .collect();

    if pool.is_empty() {
        return Err(SessionError::NoQuestionsAvailable);
    }
    Ok(pool)
}

/// Splits `target` questions over `n` subjects: integer division, with the
/// remainder handed to the first subjects in selection order.
pub fn subject_shares(target: usize, n: usize) -> Vec<usize> {
    if n == 0 {
        return vec![];
    }
    let base = target / n;
    let remainder = target % n;
    (0..n)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Builds the candidate pool for a custom multi-subject test.
///
/// Each subject contributes up to its share, drawn from an independently
/// shuffled slice of its own questions. A subject with nothing usable is
/// skipped silently; its share is not reassigned (the working-set pad makes
/// up the difference later). An empty combined pool is an error.
pub fn build_custom_pool<R: Rng + ?Sized>(
    sources: &[(Subject, Vec<TestTemplate>)],
    scheme: &MarkingScheme,
    rng: &mut R,
) -> Result<Vec<Question>, SessionError> {
    let shares = subject_shares(scheme.question_count, sources.len());

    let mut pool = Vec::new();
    for (subject_index, ((subject, tests), share)) in
        sources.iter().zip(shares.iter()).enumerate()
    {
        // All of this subject's questions, stamped with the subject itself
        // so custom-mode grouping works regardless of source sections.
        let section = Section {
            title: subject.name.clone(),
            subject_id: Some(subject.id.clone()),
            subject_name: Some(subject.name.clone()),
            questions: vec![],
        };
        let mut slice: Vec<Question> = tests
            .iter()
            .flat_map(|t| t.sections.iter())
            .flat_map(|sec| sec.questions.iter())
            .map(|q| stamp(q, &section, subject_index, scheme))
            .collect();

        if slice.is_empty() {
            log::warn!("subject `{}` has no usable questions, skipping", subject.id);
            continue;
        }

        slice.shuffle(rng);
        slice.truncate(*share);
        pool.extend(slice);
    }

    if pool.is_empty() {
        return Err(SessionError::NoQuestionsAvailable);
    }
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn template(id: &str, per_section: &[usize]) -> TestTemplate {
        let sections = per_section
            .iter()
            .enumerate()
            .map(|(si, &n)| Section {
                title: format!("Section {si}"),
                subject_id: Some(id.to_string()),
                subject_name: Some(format!("Subject {id}")),
                questions: (0..n)
                    .map(|qi| TemplateQuestion {
                        id: format!("{id}-s{si}-q{qi}"),
                        text: format!("question {qi} of section {si}"),
                        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                        correct_answer_index: qi % 4,
                        explanation: None,
                    })
                    .collect(),
            })
            .collect();
        TestTemplate {
            id: id.to_string(),
            title: format!("Test {id}"),
            description: String::new(),
            sections,
        }
    }

    fn subject(id: &str) -> Subject {
        Subject {
            id: id.to_string(),
            name: format!("Subject {id}"),
        }
    }

    #[test]
    fn build_pool_flattens_and_stamps() {
        let scheme = MarkingScheme::for_mode(TestMode::Subject);
        let pool = build_pool(&template("os", &[3, 2]), &scheme).unwrap();
        assert_eq!(pool.len(), 5);
        assert_eq!(pool[0].section_index, 0);
        assert_eq!(pool[4].section_index, 1);
        assert_eq!(pool[4].section_title, "Section 1");
        assert!(pool.iter().all(|q| q.marks_on_correct == 4));
        assert!(pool.iter().all(|q| q.marks_lost_on_incorrect == 1));
    }

    #[test]
    fn build_pool_rejects_empty_template() {
        let scheme = MarkingScheme::STANDARD;
        let empty = template("x", &[]);
        assert!(matches!(
            build_pool(&empty, &scheme),
            Err(SessionError::NoQuestionsAvailable)
        ));
    }

    #[test]
    fn shares_sum_to_target_and_differ_by_at_most_one() {
        for n in 1..=8 {
            let shares = subject_shares(30, n);
            assert_eq!(shares.iter().sum::<usize>(), 30);
            let min = *shares.iter().min().unwrap();
            let max = *shares.iter().max().unwrap();
            assert!(max - min <= 1);
        }
        // 30 over 4: first two get the remainder.
        assert_eq!(subject_shares(30, 4), vec![8, 8, 7, 7]);
    }

    #[test]
    fn custom_pool_takes_each_share() {
        let scheme = MarkingScheme::STANDARD;
        let mut rng = StdRng::seed_from_u64(7);
        let sources = vec![
            (subject("a"), vec![template("a", &[20])]),
            (subject("b"), vec![template("b", &[20])]),
        ];
        let pool = build_custom_pool(&sources, &scheme, &mut rng).unwrap();
        assert_eq!(pool.len(), 30);
        assert_eq!(pool.iter().filter(|q| q.subject_id == "a").count(), 15);
        assert_eq!(pool.iter().filter(|q| q.subject_id == "b").count(), 15);
    }

    #[test]
    fn empty_subject_is_skipped_without_reassigning_its_share() {
        let scheme = MarkingScheme::STANDARD;
        let mut rng = StdRng::seed_from_u64(7);
        let sources = vec![
            (subject("a"), vec![template("a", &[20])]),
            (subject("b"), vec![]),
        ];
        let pool = build_custom_pool(&sources, &scheme, &mut rng).unwrap();
        // Subject a keeps its own share of 15; b's share is lost here and
        // made up by the working-set pad.
        assert_eq!(pool.len(), 15);
        assert!(pool.iter().all(|q| q.subject_id == "a"));
    }

    #[test]
    fn all_subjects_empty_is_an_error() {
        let scheme = MarkingScheme::STANDARD;
        let mut rng = StdRng::seed_from_u64(7);
        let sources = vec![(subject("a"), vec![]), (subject("b"), vec![])];
        assert!(matches!(
            build_custom_pool(&sources, &scheme, &mut rng),
            Err(SessionError::NoQuestionsAvailable)
        ));
    }

    #[test]
    fn short_subject_contributes_what_it_has() {
        // Scenario E: 2 subjects, one has only 14 of its 15-question share.
        let scheme = MarkingScheme::STANDARD;
        let mut rng = StdRng::seed_from_u64(7);
        let sources = vec![
            (subject("a"), vec![template("a", &[20])]),
            (subject("b"), vec![template("b", &[14])]),
        ];
        let pool = build_custom_pool(&sources, &scheme, &mut rng).unwrap();
        assert_eq!(pool.iter().filter(|q| q.subject_id == "a").count(), 15);
        assert_eq!(pool.iter().filter(|q| q.subject_id == "b").count(), 14);
    }
}
