pub mod comment;
pub mod photo;
pub mod social;
pub mod user;

pub use comment::{Comment, NewComment};
pub use photo::{NewPhoto, Photo, PhotoChanges};
pub use social::{NewSocial, Social, SocialChanges};
pub use user::{NewUser, User, UserChanges};
