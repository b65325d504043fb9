//! Integration test: walk a rooftop through two construction stages, then
//! replace the base image, checking what the model is asked for and what
//! the viewer would show at each step.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::RefCell;

use async_trait::async_trait;
use futures::executor::block_on;
use rooftop_gen::{GenerateError, ImageTransformer, generate_stage};
use rooftop_stages::{Completion, ImagePayload, Session, Stage};

/// Records every call and answers from a queue of prepared renders.
#[derive(Default)]
struct Scripted {
    calls: RefCell<Vec<(ImagePayload, String)>>,
    answers: RefCell<Vec<ImagePayload>>,
}

#[async_trait(?Send)]
impl ImageTransformer for Scripted {
    async fn transform_image(
        &self,
        base: &ImagePayload,
        prompt: &str,
    ) -> Result<ImagePayload, GenerateError> {
        self.calls
            .borrow_mut()
            .push((base.clone(), prompt.to_owned()));
        let mut answers = self.answers.borrow_mut();
        if answers.is_empty() {
            return Err(GenerateError::NoImage {
                text: None,
                reason: None,
            });
        }
        Ok(answers.remove(0))
    }
}

fn png(seed: u8) -> ImagePayload {
    ImagePayload::from_bytes("image/png", &[0x89, b'P', b'N', b'G', seed]).unwrap()
}

#[test]
fn upload_generate_reuse_and_replace() {
    let (i1, i2, g1, g2) = (png(1), png(2), png(10), png(20));
    let model = Scripted {
        answers: RefCell::new(vec![g1.clone(), g2.clone()]),
        ..Scripted::default()
    };
    let mut session = Session::new();

    session.upload(i1.clone());
    assert_eq!(session.display(), Some(&i1));

    // Foundation: first render.
    let outcome = block_on(generate_stage(&mut session, &model, Stage::Foundation)).unwrap();
    assert_eq!(outcome, Completion::Applied(Stage::Foundation));
    assert_eq!(session.active_stage(), Stage::Foundation);
    assert_eq!(session.display(), Some(&g1));
    assert_eq!(session.gallery().len(), 1);

    // Foundation again: served from the gallery.
    block_on(generate_stage(&mut session, &model, Stage::Foundation)).unwrap();
    assert_eq!(model.calls.borrow().len(), 1);
    assert_eq!(session.display(), Some(&g1));

    // Masonry: the model sees the original upload and the masonry prompt.
    block_on(generate_stage(&mut session, &model, Stage::Masonry)).unwrap();
    {
        let calls = model.calls.borrow();
        assert_eq!(calls.len(), 2);
        let (base, prompt) = &calls[1];
        assert_eq!(base, &i1);
        assert_eq!(
            Some(prompt.as_str()),
            Stage::Masonry.config().map(|c| c.prompt)
        );
    }
    let cached: Vec<(Stage, &ImagePayload)> = session
        .gallery()
        .iter()
        .map(|image| (image.stage, &image.url))
        .collect();
    assert_eq!(
        cached,
        vec![(Stage::Foundation, &g1), (Stage::Masonry, &g2)]
    );
    assert_eq!(session.active_stage(), Stage::Masonry);

    // Hold to compare.
    session.set_show_original(true);
    assert_eq!(session.display(), Some(&i1));
    session.set_show_original(false);

    // New upload wipes the renders.
    session.upload(i2.clone());
    assert!(session.gallery().is_empty());
    assert_eq!(session.active_stage(), Stage::Original);
    assert_eq!(session.display(), Some(&i2));

    // The queue is empty now, so the next stage fails without side effects.
    let outcome = block_on(generate_stage(&mut session, &model, Stage::Finishing)).unwrap();
    assert_eq!(outcome, Completion::Failed(Stage::Finishing));
    assert!(session.gallery().is_empty());
    assert!(session.error().is_some());
    assert_eq!(session.display(), Some(&i2));
}
