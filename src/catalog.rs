//! Exercises bundled with the client, playable without a backend.

use crate::models::{Exercise, Phase, PhaseKind};

fn exercise(id: i64, label: &str, description: &str, phases: Vec<Phase>) -> Exercise {
    Exercise {
        id,
        label: label.to_string(),
        description: description.to_string(),
        phases,
        is_professional: false,
    }
}

fn phase(kind: PhaseKind, duration_seconds: i64, instruction: &str) -> Phase {
    Phase::new(kind, duration_seconds).with_instruction(instruction)
}

pub fn builtin_exercises() -> Vec<Exercise> {
    use PhaseKind::{Exhale, Hold, Inhale};

    vec![
        exercise(
            1,
            "Cohérence Cardiaque 365",
            "Technique de respiration 3-6-5 pour équilibrer votre rythme cardiaque et réduire le stress.",
            vec![
                phase(Inhale, 5, "Inspirez profondément par le nez, sentez votre poitrine se gonfler"),
                phase(Exhale, 5, "Expirez lentement par la bouche, relâchez toute tension"),
            ],
        ),
        exercise(
            2,
            "Respiration Carrée",
            "Technique de respiration en 4 temps pour améliorer la concentration et la gestion du stress.",
            vec![
                phase(Inhale, 4, "Inspirez lentement en comptant jusqu'à 4"),
                phase(Hold, 4, "Retenez votre souffle en comptant jusqu'à 4"),
                phase(Exhale, 4, "Expirez lentement en comptant jusqu'à 4"),
                phase(Hold, 4, "Restez sans respirer en comptant jusqu'à 4"),
            ],
        ),
        exercise(
            3,
            "Respiration Relaxante",
            "Respiration profonde pour la détente musculaire et la relaxation mentale. Idéale avant le sommeil.",
            vec![
                phase(Inhale, 6, "Inspirez profondément, remplissez vos poumons d'air pur"),
                phase(Exhale, 8, "Expirez très lentement, relâchez tous vos muscles"),
            ],
        ),
        exercise(
            4,
            "Respiration Énergisante",
            "Respiration dynamique pour augmenter votre énergie et votre vitalité. Parfaite pour le matin.",
            vec![
                phase(Inhale, 3, "Inspirez rapidement et énergiquement"),
                phase(Exhale, 3, "Expirez avec force et détermination"),
            ],
        ),
        exercise(
            5,
            "Respiration Méditative",
            "Respiration consciente pour la méditation et la pleine conscience.",
            vec![
                phase(Inhale, 7, "Inspirez en conscience, observez l'air qui entre"),
                phase(Hold, 3, "Restez présent, observez votre respiration"),
                phase(Exhale, 7, "Expirez en conscience, laissez partir les tensions"),
            ],
        ),
    ]
}

pub fn find_builtin(id: i64) -> Option<Exercise> {
    builtin_exercises().into_iter().find(|exercise| exercise.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breathing::validate_exercise;

    #[test]
    fn every_builtin_is_playable() {
        for exercise in builtin_exercises() {
            assert!(validate_exercise(&exercise).is_ok(), "{}", exercise.label);
        }
    }

    #[test]
    fn ids_are_unique_and_findable() {
        let exercises = builtin_exercises();
        for exercise in &exercises {
            assert_eq!(find_builtin(exercise.id).as_ref(), Some(exercise));
        }
        assert!(find_builtin(99).is_none());
    }
}
