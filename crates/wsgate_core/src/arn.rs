use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A lambda function ARN parsed once at ingestion.
///
/// Shape: `arn:{partition}:lambda:{region}:{account}:function:{name}`,
/// optionally followed by a `:{qualifier}` segment for version-qualified
/// ARNs published by the deployment stack. Malformed input is rejected
/// here instead of being misindexed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaArn {
    partition: String,
    region: String,
    account: String,
    function_name: String,
    qualifier: Option<String>,
}

impl LambdaArn {
    pub fn partition(&self) -> &str {
        &self.partition
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    /// Source ARN covering every stage and route of the given gateway,
    /// used to scope the gateway's invoke permission on this function.
    pub fn execute_api_source_arn(&self, api_id: &str) -> String {
        format!(
            "arn:{}:execute-api:{}:{}:{api_id}/*/*",
            self.partition, self.region, self.account
        )
    }
}

impl fmt::Display for LambdaArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:lambda:{}:{}:function:{}",
            self.partition, self.region, self.account, self.function_name
        )?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, ":{qualifier}")?;
        }
        Ok(())
    }
}

impl FromStr for LambdaArn {
    type Err = CoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| CoreError::MalformedArn {
            arn: input.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = input.split(':').collect();
        if segments.len() != 7 && segments.len() != 8 {
            return Err(malformed("expected 7 or 8 colon-delimited segments"));
        }
        if segments[0] != "arn" {
            return Err(malformed("missing 'arn' prefix"));
        }
        if segments[2] != "lambda" {
            return Err(malformed("not a lambda ARN"));
        }
        if segments[5] != "function" {
            return Err(malformed("resource is not a function"));
        }

        let partition = segments[1];
        let region = segments[3];
        let account = segments[4];
        let function_name = segments[6];
        if partition.is_empty() || region.is_empty() || account.is_empty() {
            return Err(malformed("partition, region, and account must be non-empty"));
        }
        if function_name.is_empty() {
            return Err(malformed("function name must be non-empty"));
        }

        Ok(Self {
            partition: partition.to_string(),
            region: region.to_string(),
            account: account.to_string(),
            function_name: function_name.to_string(),
            qualifier: segments.get(7).map(|qualifier| (*qualifier).to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_unqualified_function_arn() {
        let arn: LambdaArn = "arn:aws:lambda:us-east-1:111122223333:function:foo"
            .parse()
            .expect("arn should parse");

        assert_eq!(arn.partition(), "aws");
        assert_eq!(arn.region(), "us-east-1");
        assert_eq!(arn.account(), "111122223333");
        assert_eq!(arn.function_name(), "foo");
        assert_eq!(arn.qualifier(), None);
    }

    #[test]
    fn parses_version_qualified_arn_from_stack_outputs() {
        let arn: LambdaArn = "arn:aws:lambda:eu-west-1:111122223333:function:onMessage:4"
            .parse()
            .expect("qualified arn should parse");

        assert_eq!(arn.function_name(), "onMessage");
        assert_eq!(arn.qualifier(), Some("4"));
        assert_eq!(
            arn.to_string(),
            "arn:aws:lambda:eu-west-1:111122223333:function:onMessage:4"
        );
    }

    #[test]
    fn derives_execute_api_source_arn() {
        let arn: LambdaArn = "arn:aws:lambda:us-east-1:111122223333:function:foo"
            .parse()
            .expect("arn should parse");

        assert_eq!(
            arn.execute_api_source_arn("abc123"),
            "arn:aws:execute-api:us-east-1:111122223333:abc123/*/*"
        );
    }

    #[test]
    fn rejects_non_lambda_arn() {
        let error = "arn:aws:s3:::my-bucket"
            .parse::<LambdaArn>()
            .expect_err("s3 arn should fail");

        let CoreError::MalformedArn { reason, .. } = error else {
            panic!("expected a malformed-arn error");
        };
        assert!(reason.contains("segments"));
    }

    #[test]
    fn rejects_truncated_arn() {
        let error = "arn:aws:lambda:us-east-1:111122223333"
            .parse::<LambdaArn>()
            .expect_err("truncated arn should fail");

        assert!(matches!(error, CoreError::MalformedArn { .. }));
    }

    #[test]
    fn rejects_arn_with_empty_region() {
        let error = "arn:aws:lambda::111122223333:function:foo"
            .parse::<LambdaArn>()
            .expect_err("empty region should fail");

        let CoreError::MalformedArn { reason, .. } = error else {
            panic!("expected a malformed-arn error");
        };
        assert!(reason.contains("region"));
    }
}
