//! Canned instruction templates for guided visualization workflows.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PromptError {
    #[error("Unknown prompt: {0}")]
    UnknownPrompt(String),

    #[error("Missing required argument '{argument}' for prompt '{prompt}'")]
    MissingArgument {
        prompt: &'static str,
        argument: &'static str,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub arguments: Vec<PromptArgument>,
}

pub fn catalog() -> Vec<PromptSpec> {
    vec![
        PromptSpec {
            name: "basic_visualization",
            description: "Create a prompt for basic protein visualization",
            arguments: vec![PromptArgument {
                name: "pdb_id",
                description: "PDB ID of the structure to visualize",
                required: true,
            }],
        },
        PromptSpec {
            name: "binding_site_analysis",
            description: "Create a prompt for binding site analysis",
            arguments: vec![
                PromptArgument {
                    name: "pdb_id",
                    description: "PDB ID of the complex",
                    required: true,
                },
                PromptArgument {
                    name: "ligand_name",
                    description: "Residue name of the ligand (default: LIG)",
                    required: false,
                },
            ],
        },
        PromptSpec {
            name: "custom_command_sequence",
            description: "Create a prompt for running a custom sequence of PyMOL commands",
            arguments: vec![],
        },
    ]
}

/// Fills in the named template.
pub fn render(name: &str, arguments: &HashMap<String, String>) -> Result<String, PromptError> {
    match name {
        "basic_visualization" => {
            let pdb_id = required(arguments, "basic_visualization", "pdb_id")?;
            Ok(basic_visualization(pdb_id))
        }
        "binding_site_analysis" => {
            let pdb_id = required(arguments, "binding_site_analysis", "pdb_id")?;
            let ligand_name = arguments
                .get("ligand_name")
                .map(String::as_str)
                .unwrap_or("LIG");
            Ok(binding_site_analysis(pdb_id, ligand_name))
        }
        "custom_command_sequence" => Ok(custom_command_sequence()),
        _ => Err(PromptError::UnknownPrompt(name.to_string())),
    }
}

fn required<'a>(
    arguments: &'a HashMap<String, String>,
    prompt: &'static str,
    argument: &'static str,
) -> Result<&'a str, PromptError> {
    arguments
        .get(argument)
        .map(String::as_str)
        .ok_or(PromptError::MissingArgument { prompt, argument })
}

pub fn basic_visualization(pdb_id: &str) -> String {
    format!(
        "
Visualize the protein structure with PDB ID {pdb_id} in the following way:
1. Fetch the structure
2. Show it as cartoon representation
3. Color by secondary structure
4. Show sticks for all ligands
5. Apply a white surface to the protein
6. Zoom to center the view
7. Render a high-quality image
"
    )
}

pub fn binding_site_analysis(pdb_id: &str, ligand_name: &str) -> String {
    format!(
        "
Analyze the binding site of ligand {ligand_name} in structure {pdb_id}:
1. Fetch the structure
2. Show the protein as cartoon
3. Select the ligand using \"resn {ligand_name}\"
4. Show the ligand as sticks and color it in magenta
5. Select residues within 5A of the ligand
6. Show those residues as sticks
7. Label them with their residue names and numbers
8. Measure key interactions (distances) between the ligand and binding site residues
9. Render a high-quality image of the binding site
"
    )
}

pub fn custom_command_sequence() -> String {
    "
Please help me run a series of PyMOL commands to manipulate and visualize my molecule.
I'll provide the commands I want to run, and you can execute them one by one.

For example:
1. fetch 1dn2
2. show cartoon
3. color green, chain A
4. color blue, chain B
5. show sticks, resn ATP
6. zoom
7. render an image
"
    .to_string()
}
