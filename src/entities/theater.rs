use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theater {
    pub id: Uuid,
    pub name: String,
    pub city_id: Uuid,
}
