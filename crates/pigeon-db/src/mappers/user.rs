//! User model <-> entity mapper

use pigeon_core::entities::User;
use pigeon_core::value_objects::UserId;

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: UserId::from_uuid(model.id),
            name: model.name,
            photo: model.photo,
        }
    }
}
