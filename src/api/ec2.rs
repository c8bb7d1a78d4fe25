/// EC2-backed implementation of the provider API
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_ec2::config::Region;
use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client;

use crate::api::client::ComputeApi;
use crate::config::DEFAULT_REGION;
use crate::error::SweepError;
use crate::models::{InstanceRecord, InstanceState, StateChange};

/// Provider error codes that mean the credentials themselves were rejected.
const AUTH_ERROR_CODES: [&str; 6] = [
    "AuthFailure",
    "UnauthorizedOperation",
    "ExpiredToken",
    "InvalidClientTokenId",
    "SignatureDoesNotMatch",
    "RequestExpired",
];

/// EC2 client bound to a single region.
pub struct Ec2Api {
    client: Client,
}

impl Ec2Api {
    /// Resolve credentials and region from the environment and build the
    /// SDK client. `region_override` wins over the ambient resolution;
    /// when nothing resolves, the default region applies.
    pub async fn connect(region_override: Option<String>) -> Self {
        let region_provider = RegionProviderChain::first_try(region_override.map(Region::new))
            .or_default_provider()
            .or_else(Region::new(DEFAULT_REGION));
        let conf = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        let client = Client::new(&conf);
        tracing::debug!(region = ?client.config().region(), "EC2 client ready");
        Self { client }
    }
}

#[async_trait]
impl ComputeApi for Ec2Api {
    async fn describe_instances(
        &self,
        states: &[&str],
    ) -> Result<Vec<InstanceRecord>, SweepError> {
        let mut filter = Filter::builder().name("instance-state-name");
        for state in states {
            filter = filter.values(*state);
        }

        let resp = self
            .client
            .describe_instances()
            .filters(filter.build())
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let mut records = Vec::new();
        for reservation in resp.reservations() {
            for instance in reservation.instances() {
                let id = instance.instance_id().unwrap_or_default().to_string();
                if id.is_empty() {
                    continue;
                }
                let instance_type = instance
                    .instance_type()
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default();
                let state = instance
                    .state()
                    .and_then(|s| s.name())
                    .map(|n| InstanceState::parse(n.as_str()))
                    .unwrap_or_else(|| InstanceState::Other("unknown".to_string()));
                records.push(InstanceRecord {
                    id,
                    instance_type,
                    state,
                });
            }
        }
        tracing::debug!("Described {} instance(s)", records.len());
        Ok(records)
    }

    async fn stop_instances(&self, ids: &[String]) -> Result<Vec<StateChange>, SweepError> {
        let resp = self
            .client
            .stop_instances()
            .set_instance_ids(Some(ids.to_vec()))
            .send()
            .await
            .map_err(classify_sdk_error)?;

        let changes = resp
            .stopping_instances()
            .iter()
            .filter_map(|change| {
                let instance_id = change.instance_id()?.to_string();
                Some(StateChange {
                    instance_id,
                    previous_state: project_state(change.previous_state()),
                    current_state: project_state(change.current_state()),
                })
            })
            .collect();
        Ok(changes)
    }
}

fn project_state(state: Option<&aws_sdk_ec2::types::InstanceState>) -> InstanceState {
    state
        .and_then(|s| s.name())
        .map(|n| InstanceState::parse(n.as_str()))
        .unwrap_or_else(|| InstanceState::Other("unknown".to_string()))
}

/// Sort an SDK failure into the error taxonomy: connection-level problems
/// are `Transport`, provider-reported errors are triaged by code.
fn classify_sdk_error<E>(err: SdkError<E>) -> SweepError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    match err {
        SdkError::ServiceError(ctx) => classify_api_error(ctx.err().code(), ctx.err().message()),
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            SweepError::Transport(DisplayErrorContext(err).to_string())
        }
        other => SweepError::Api {
            code: "Unknown".to_string(),
            message: DisplayErrorContext(other).to_string(),
        },
    }
}

fn classify_api_error(code: Option<&str>, message: Option<&str>) -> SweepError {
    let code = code.unwrap_or("Unknown");
    let message = message.unwrap_or("(no message)").to_string();
    if AUTH_ERROR_CODES.contains(&code) {
        SweepError::Auth(format!("{}: {}", code, message))
    } else if code.ends_with(".NotFound") {
        SweepError::NotFound(message)
    } else {
        SweepError::Api {
            code: code.to_string(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_codes_classify_as_auth() {
        for code in AUTH_ERROR_CODES {
            let err = classify_api_error(Some(code), Some("denied"));
            assert!(matches!(err, SweepError::Auth(_)), "code {} misclassified", code);
        }
    }

    #[test]
    fn test_not_found_code_classifies_as_not_found() {
        let err = classify_api_error(
            Some("InvalidInstanceID.NotFound"),
            Some("The instance ID 'i-404' does not exist"),
        );
        assert!(matches!(err, SweepError::NotFound(_)));
    }

    #[test]
    fn test_other_codes_classify_as_api() {
        let err = classify_api_error(Some("RequestLimitExceeded"), Some("slow down"));
        match err {
            SweepError::Api { code, message } => {
                assert_eq!(code, "RequestLimitExceeded");
                assert_eq!(message, "slow down");
            }
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_code_classifies_as_api_unknown() {
        let err = classify_api_error(None, None);
        match err {
            SweepError::Api { code, .. } => assert_eq!(code, "Unknown"),
            other => panic!("expected Api, got {:?}", other),
        }
    }
}
