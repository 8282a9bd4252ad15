//! Builder-call source for the current tracks

use keyline_animation::{Easing, PropertyAnimation, Timeline};

use crate::track::{Track, Tracks};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "do", "dyn", "else",
    "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop", "macro",
    "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "self", "static",
    "struct", "super", "trait", "true", "try", "type", "typeof", "unsafe", "use", "where",
    "while", "yield",
];

/// Variable name used for an object's target handle
pub fn target_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// One `to` call of an exported chain
#[derive(Clone, Debug, PartialEq)]
pub struct ExportStep {
    pub property: String,
    pub value: f64,
    /// Seconds after the previous step of the same track ends
    pub delay: f64,
    pub duration: f64,
    pub easing: Easing,
}

/// Chain statement reproducing one property track
#[derive(Clone, Debug, PartialEq)]
pub struct ExportChain {
    pub object: String,
    pub steps: Vec<ExportStep>,
}

/// Steps for every property track that has animations
///
/// Each track becomes its own chain starting at zero, so delays are taken
/// from the track's running end rather than from the source chain.
pub fn export_chains(tracks: &Tracks, timeline: &Timeline) -> Vec<ExportChain> {
    let mut chains = Vec::new();
    for (_, track) in tracks.iter() {
        let Track::Property(property) = track else {
            continue;
        };
        let mut anims: Vec<&PropertyAnimation> = property
            .anims
            .iter()
            .filter_map(|&id| timeline.animation(id))
            .collect();
        if anims.is_empty() {
            continue;
        }
        anims.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut track_end = 0.0;
        let steps = anims
            .into_iter()
            .map(|anim| {
                let step = ExportStep {
                    property: anim.property.clone(),
                    value: anim.end_value,
                    delay: anim.start_time - track_end,
                    duration: anim.duration(),
                    easing: anim.easing,
                };
                track_end = anim.end_time;
                step
            })
            .collect();

        let object = tracks.get(property.parent).map(Track::name).unwrap_or_default();
        chains.push(ExportChain {
            object: object.to_string(),
            steps,
        });
    }
    chains
}

/// One chain statement per property track that has animations
pub fn export_code(tracks: &Tracks, timeline: &Timeline) -> String {
    let mut code = String::new();
    for chain in export_chains(tracks, timeline) {
        code.push_str(&format!(
            "timeline.chain(Some({:?}), {})",
            chain.object,
            target_ident(&chain.object)
        ));
        for step in &chain.steps {
            code.push_str(&format_step(step));
        }
        code.push_str(";\n");
    }
    code
}

fn format_step(step: &ExportStep) -> String {
    let mut options = String::from("TweenOptions::default()");
    if step.delay != 0.0 {
        options.push_str(&format!(".delay({:?})", step.delay));
    }
    options.push_str(&format!(".duration({:?})", step.duration));
    if step.easing != Easing::Linear {
        options.push_str(&format!(".easing(Easing::{:?})", step.easing));
    }
    format!(".to([({:?}, {:?})], {})", step.property, step.value, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyline_animation::{PropertyBag, TweenOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn idents_are_valid_rust() {
        assert_eq!(target_ident("box"), "box_");
        assert_eq!(target_ident("Hero Image"), "hero_image");
        assert_eq!(target_ident("3d"), "_3d");
        assert_eq!(target_ident(""), "_");
    }

    #[test]
    fn exports_one_statement_per_property_track() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        tl.chain(Some("box"), target)
            .to(
                [("x", 400.0)],
                TweenOptions::default().easing(Easing::CubicIn),
            )
            .to(
                [("y", 20.0)],
                TweenOptions::default().delay(0.5).duration(2.0),
            );

        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);
        assert_eq!(
            export_code(&tracks, &tl),
            concat!(
                "timeline.chain(Some(\"box\"), box_)",
                ".to([(\"x\", 400.0)], TweenOptions::default().duration(1.0).easing(Easing::CubicIn));\n",
                "timeline.chain(Some(\"box\"), box_)",
                ".to([(\"y\", 20.0)], TweenOptions::default().delay(1.5).duration(2.0));\n",
            )
        );
    }

    fn spans(timeline: &Timeline) -> Vec<(String, f64, f64)> {
        let mut spans: Vec<(String, f64, f64)> = timeline
            .animations()
            .iter()
            .map(|a| (a.property.clone(), a.start_time, a.end_time))
            .collect();
        spans.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
        spans
    }

    #[test]
    fn replayed_export_reproduces_every_span() {
        let mut tl = Timeline::new();
        let target = tl.add_target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        tl.chain(Some("box"), target)
            .to([("x", 100.0)], TweenOptions::default())
            .to([("y", 20.0)], TweenOptions::default().delay(0.5).duration(2.0))
            .to([("x", 0.0)], TweenOptions::default().delay(0.25))
            .to(
                [("x", 50.0), ("y", 5.0)],
                TweenOptions::default().duration(0.5).easing(Easing::QuadraticOut),
            );
        let mut tracks = Tracks::new();
        tracks.rebuild(&tl);

        let mut replay = Timeline::new();
        let copy = replay.add_target(PropertyBag::new().with("x", 0.0).with("y", 0.0));
        for chain in export_chains(&tracks, &tl) {
            let mut builder = replay.chain(Some(chain.object.as_str()), copy);
            for step in chain.steps {
                builder = builder.to(
                    [(step.property.as_str(), step.value)],
                    TweenOptions::default()
                        .delay(step.delay)
                        .duration(step.duration)
                        .easing(step.easing),
                );
            }
        }

        assert_eq!(spans(&replay), spans(&tl));
    }
}
