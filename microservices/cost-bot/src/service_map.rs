//! Short display names for AWS services

use std::collections::HashMap;
use std::sync::OnceLock;

/// Full Cost Explorer service name → alias shown in the invoice.
const SERVICE_ALIASES: &[(&str, &str)] = &[
    ("Amazon Elastic Compute Cloud - Compute", "EC2"),
    ("Amazon Simple Storage Service", "S3"),
    ("Amazon Relational Database Service", "RDS"),
    ("AWS Lambda", "Lambda"),
    ("AWS Cost Explorer", "Cost Explorer"),
    ("Amazon CloudWatch", "CloudWatch"),
    ("Amazon DynamoDB", "DynamoDB"),
    ("Amazon Route 53", "Route53"),
    ("Amazon Virtual Private Cloud", "VPC"),
    ("Amazon API Gateway", "API Gateway"),
    ("Amazon Simple Notification Service", "SNS"),
    ("Amazon Simple Queue Service", "SQS"),
    ("Amazon Kinesis", "Kinesis"),
    ("Amazon CloudFront", "CloudFront"),
    ("Amazon Elastic Block Store", "EBS"),
    ("Amazon Elastic File System", "EFS"),
    ("Amazon Redshift", "Redshift"),
    ("Amazon Elastic Load Balancing", "ELB"),
    ("Amazon Simple Email Service", "SES"),
    ("Amazon Elastic Container Service", "ECS"),
    ("Amazon Elastic Container Registry", "ECR"),
    ("Amazon Elastic Container Service for Kubernetes", "EKS"),
    ("Amazon Simple DB", "SimpleDB"),
    ("Amazon CloudTrail", "CloudTrail"),
    ("Amazon Elastic Kubernetes Service", "EKS"),
];

fn aliases() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| SERVICE_ALIASES.iter().copied().collect())
}

/// Alias for `name`, or `name` itself when it has none.
pub fn short_name(name: &str) -> &str {
    aliases().get(name).copied().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_service_is_abbreviated() {
        assert_eq!(short_name("Amazon Elastic Compute Cloud - Compute"), "EC2");
        assert_eq!(short_name("AWS Lambda"), "Lambda");
    }

    #[test]
    fn test_unknown_service_is_unchanged() {
        assert_eq!(short_name("Tax"), "Tax");
        assert_eq!(short_name("Amazon Bedrock"), "Amazon Bedrock");
    }

    #[test]
    fn test_lookup_is_exact() {
        assert_eq!(short_name("aws lambda"), "aws lambda");
    }
}
