use super::{clean, ToDomain};
use crate::api::dto::UserDto;
use crate::model::user::UserData;

impl ToDomain for UserDto {
    type Entity = UserData;

    fn to_domain(self) -> UserData {
        UserData {
            id: self.id,
            name: clean(self.name),
            role: clean(self.role),
            email: clean(self.email),
            phone: clean(self.phone),
            avis_id: clean(self.avis_id),
            avatar: clean(self.avatar),
            avatar_url: clean(self.avatar_url),
            email_verified_at: clean(self.email_verified_at),
            created_at: clean(self.created_at),
            updated_at: clean(self.updated_at),
        }
    }
}
