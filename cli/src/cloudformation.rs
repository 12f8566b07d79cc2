use aws_config::BehaviorVersion;
use eyre::WrapErr;

/// What CloudFormation reports about a valid template
pub(crate) struct Validation {
    /// IAM capabilities the stack has to be deployed with, e.g. CAPABILITY_IAM
    pub(crate) capabilities: Vec<String>,
    pub(crate) capabilities_reason: Option<String>,
}

/// Ask CloudFormation to validate the template body
///
/// Read-only call, no stack is created or changed.
pub(crate) async fn validate(body: &str) -> eyre::Result<Validation> {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    let client = aws_sdk_cloudformation::Client::new(&config);

    let output = client
        .validate_template()
        .template_body(body)
        .send()
        .await
        .wrap_err("CloudFormation rejected the template")?;

    log::debug!("Validated template: {output:?}");

    Ok(Validation {
        capabilities: output
            .capabilities()
            .iter()
            .map(|capability| capability.as_str().to_string())
            .collect(),
        capabilities_reason: output.capabilities_reason().map(str::to_string),
    })
}
