use std::ops::{Deref, DerefMut};

use imgconv_engine::{Engine, EngineError};
use imgconv_image::{ColorLayout, ImageSize, SampleDepth, TypedImage};

/// An engine image that lives until the end of a scope.
///
/// [`Scoped::finish`] synchronizes the engine with [`Engine::finish`], hands
/// the image back with [`Engine::release`] and reports a failed barrier. When
/// dropped without it, on error paths, the same happens and a failed barrier
/// is only logged.
pub(crate) struct Scoped<'e, E: Engine + ?Sized> {
    engine: &'e E,
    image: TypedImage,
    released: bool,
}

impl<'e, E: Engine + ?Sized> Scoped<'e, E> {
    pub(crate) fn alloc(
        engine: &'e E,
        size: ImageSize,
        layout: ColorLayout,
        depth: SampleDepth,
    ) -> Result<Self, EngineError> {
        let image = engine.alloc(size, layout, depth)?;
        log::trace!("temporary {size} {layout} {depth} on {}", engine.name());
        Ok(Self {
            engine,
            image,
            released: false,
        })
    }

    /// Wait for the engine and release the image.
    pub(crate) fn finish(mut self) -> Result<(), EngineError> {
        let result = self.engine.finish();
        self.release();
        result
    }

    fn release(&mut self) {
        let placeholder = TypedImage::empty(self.image.layout(), self.image.depth());
        self.engine
            .release(std::mem::replace(&mut self.image, placeholder));
        self.released = true;
    }
}

impl<E: Engine + ?Sized> Deref for Scoped<'_, E> {
    type Target = TypedImage;

    fn deref(&self) -> &TypedImage {
        &self.image
    }
}

impl<E: Engine + ?Sized> DerefMut for Scoped<'_, E> {
    fn deref_mut(&mut self) -> &mut TypedImage {
        &mut self.image
    }
}

impl<E: Engine + ?Sized> Drop for Scoped<'_, E> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.engine.finish() {
            log::warn!("{} failed to finish before release: {err}", self.engine.name());
        }
        self.release();
    }
}

/// A source image, either borrowed from the caller or a scoped temporary.
pub(crate) enum Source<'a, 'e, E: Engine + ?Sized> {
    Borrowed(&'a TypedImage),
    Temporary(Scoped<'e, E>),
}

impl<E: Engine + ?Sized> Source<'_, '_, E> {
    /// Release the source if it is a temporary.
    pub(crate) fn finish(self) -> Result<(), EngineError> {
        match self {
            Source::Borrowed(_) => Ok(()),
            Source::Temporary(image) => image.finish(),
        }
    }
}

impl<E: Engine + ?Sized> Deref for Source<'_, '_, E> {
    type Target = TypedImage;

    fn deref(&self) -> &TypedImage {
        match self {
            Source::Borrowed(image) => *image,
            Source::Temporary(image) => &image.image,
        }
    }
}
