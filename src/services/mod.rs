pub mod clock;
pub mod dates;
pub mod extractor;
pub mod markup;
pub mod skill;
pub mod source;
