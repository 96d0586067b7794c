//! Fixture trees shared by the integration tests

use std::fs;
use std::path::Path;

use tfdeps::{AnalysisReport, Analyzer, Settings};

/// Write `content` at `relative` under `root`, creating directories
pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn settings_for(root: &Path) -> Settings {
    Settings {
        scan_path: root.to_path_buf(),
        show_progress: false,
        include_timestamp: false,
        ..Settings::default()
    }
}

pub fn analyze(root: &Path) -> AnalysisReport {
    Analyzer::new(settings_for(root)).analyze().unwrap()
}

/// Four deployable units: securitygroup, ec2 and rds depend on vpc, and rds
/// also depends on securitygroup.
pub fn aws_stack(root: &Path) {
    write(
        root,
        "vpc/terragrunt.hcl",
        r#"
terraform {
  source = "../modules//vpc"
}

inputs = {
  cidr_block = "10.0.0.0/16"
  azs        = ["eu-west-1a", "eu-west-1b"]
}
"#,
    );
    write(
        root,
        "securitygroup/terragrunt.hcl",
        r#"
terraform {
  source = "tfr:///terraform-aws-modules/security-group/aws?version=5.1.0"
}

dependency "vpc" {
  config_path = "../vpc"

  mock_outputs = {
    vpc_id = "vpc-mock"
  }
}

inputs = {
  name   = "app-sg"
  vpc_id = dependency.vpc.outputs.vpc_id
}
"#,
    );
    write(
        root,
        "ec2/terragrunt.hcl",
        r#"
terraform {
  source = "../modules//ec2"
}

dependency "vpc" {
  config_path = "../vpc"
}

inputs = {
  subnet_id     = dependency.vpc.outputs.private_subnets[0]
  instance_type = "t3.micro"
}
"#,
    );
    write(
        root,
        "rds/terragrunt.hcl",
        r#"
terraform {
  source = "../modules//rds"
}

dependency "vpc" {
  config_path = "../vpc"
}

dependency "sg" {
  config_path = "../securitygroup"
}

inputs = {
  subnet_ids             = dependency.vpc.outputs.database_subnets
  vpc_security_group_ids = [dependency.sg.outputs.security_group_id]
}
"#,
    );
}

/// The vpc unit's own Terraform code reads an output of ec2, closing a loop
pub fn induce_vpc_ec2_cycle(root: &Path) {
    write(
        root,
        "vpc/main.tf",
        r#"
module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = "5.0.0"
}

output "vpc_id" {
  value = module.vpc.vpc_id
}

output "bastion_ip" {
  value = module.ec2.private_ip
}
"#,
    );
}

/// Five units: ec2 and rds each declare vpc and securitygroup, and rds is
/// deployed from the isolated db module definition.
pub fn two_tier_stack(root: &Path) {
    write(
        root,
        "vpc/main.tf",
        r#"
module "vpc" {
  source = "terraform-aws-modules/vpc/aws"
  cidr   = var.cidr_block
}

variable "cidr_block" {
  type = string
}

output "vpc_id" {
  value = module.vpc.vpc_id
}

output "private_subnets" {
  value = module.vpc.private_subnets
}
"#,
    );
    write(
        root,
        "securitygroup/main.tf",
        r#"
resource "aws_security_group" "app" {
  name   = var.name
  vpc_id = var.vpc_id
}

variable "name" {
  type = string
}

variable "vpc_id" {
  type = string
}

output "security_group_id" {
  value = aws_security_group.app.id
}
"#,
    );
    write(
        root,
        "ec2/main.tf",
        r#"
data "aws_ami" "ubuntu" {
  most_recent = true
  owners      = ["099720109477"]
}

resource "aws_instance" "web" {
  ami                    = data.aws_ami.ubuntu.id
  subnet_id              = var.subnet_id
  vpc_security_group_ids = var.security_group_ids
}

variable "subnet_id" {
  type = string
}

variable "security_group_ids" {
  type = list(string)
}

output "private_ip" {
  value = aws_instance.web.private_ip
}
"#,
    );
    for unit in ["ec2", "rds"] {
        let source = if unit == "rds" { "../db" } else { "." };
        write(
            root,
            &format!("{}/terragrunt.hcl", unit),
            &format!(
                r#"
terraform {{
  source = "{}"
}}

dependency "vpc" {{
  config_path = "../vpc"
}}

dependency "securitygroup" {{
  config_path = "../securitygroup"
}}

inputs = {{
  subnet_id          = dependency.vpc.outputs.private_subnets[0]
  security_group_ids = [dependency.securitygroup.outputs.security_group_id]
}}
"#,
                source
            ),
        );
    }
    write(
        root,
        "db/main.tf",
        r#"
resource "aws_db_instance" "main" {
  engine         = "postgres"
  instance_class = "db.t3.micro"
  subnet_ids     = var.subnet_id
}

variable "subnet_id" {
  type = string
}

output "endpoint" {
  value = aws_db_instance.main.endpoint
}
"#,
    );
}
