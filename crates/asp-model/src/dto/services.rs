use serde::{Deserialize, Serialize};

use crate::SlaveCount;

/// Body of docker-compose-ui `PUT /services`: scale `service` in `project` to `num` replicas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesRequest {
    pub service: String,
    pub project: String,
    pub num: SlaveCount,
}

impl ServicesRequest {
    pub fn new(service: impl Into<String>, project: impl Into<String>, num: SlaveCount) -> Self {
        Self {
            service: service.into(),
            project: project.into(),
            num,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_flat_count() {
        let req = ServicesRequest::new("zap", "app-slave", SlaveCount::new(3).unwrap());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "service": "zap", "project": "app-slave", "num": 3 })
        );
    }
}
