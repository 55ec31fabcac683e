use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{digit1, space0, space1},
    combinator::{map_res, opt},
    multi::{many1, separated_list1},
    sequence::{preceded, terminated},
    IResult,
};
use std::path::Path;
use thiserror::Error;

use crate::utils::num_combinations;
use crate::Graph;

/// Everything that can disqualify an instance before the solvers run.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("cannot read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("invalid dimensions: {0}")]
    Dimensions(String),
    #[error("infeasible request: {0}")]
    Infeasible(String),
}

/// A parsed problem instance: pattern graph, host graph, requested copies.
#[derive(Debug, Clone)]
pub struct Instance {
    pub pattern: Graph,
    pub host: Graph,
    pub k: usize,
}

impl Instance {
    /// Reject dimension mismatches and requests that cannot be met by any
    /// extension because the host has too few vertex subsets.
    pub fn validate(&self) -> Result<(), InstanceError> {
        let n1 = self.pattern.num_vertices();
        let n2 = self.host.num_vertices();
        if n1 == 0 {
            return Err(InstanceError::Dimensions(
                "pattern graph has no vertices".to_string(),
            ));
        }
        if n2 < n1 {
            return Err(InstanceError::Dimensions(format!(
                "host graph has {n2} vertices, fewer than the pattern's {n1}"
            )));
        }
        if self.k == 0 {
            return Err(InstanceError::Dimensions("k must be at least 1".to_string()));
        }
        let subsets = num_combinations(n2, n1);
        if self.k > subsets {
            return Err(InstanceError::Infeasible(format!(
                "k = {} exceeds the {} distinct {n1}-vertex subsets of the host",
                self.k, subsets
            )));
        }
        Ok(())
    }
}

/// Parse line ending (handles both \n and \r\n)
fn line_ending(input: &str) -> IResult<&str, &str> {
    alt((tag("\n"), tag("\r\n")))(input)
}

/// Parse a single unsigned integer
fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |s: &str| s.parse::<usize>())(input)
}

/// Parse a row of space-separated integers
fn parse_row(input: &str) -> IResult<&str, Vec<usize>> {
    preceded(space0, separated_list1(space1, parse_usize))(input)
}

/// Parse n rows of exactly n entries each
fn parse_matrix(input: &str, n: usize) -> IResult<&str, Vec<Vec<usize>>> {
    let mut rows = Vec::with_capacity(n);
    let mut remaining = input;

    for _ in 0..n {
        let (rest, row) = terminated(parse_row, terminated(space0, opt(line_ending)))(remaining)?;
        if row.len() != n {
            return Err(nom::Err::Failure(nom::error::Error::new(
                input,
                nom::error::ErrorKind::LengthValue,
            )));
        }
        rows.push(row);
        remaining = rest;
    }

    Ok((remaining, rows))
}

/// Parse a single graph: vertex count followed by its adjacency matrix
fn parse_graph(input: &str) -> IResult<&str, Graph> {
    let (input, n) = terminated(preceded(space0, parse_usize), line_ending)(input)?;
    let (input, adj) = parse_matrix(input, n)?;
    Ok((input, Graph::from_adjacency_matrix(adj)))
}

fn instance_body(input: &str) -> IResult<&str, Instance> {
    let (input, pattern) = parse_graph(input)?;
    let (input, _) = opt(many1(line_ending))(input)?;
    let (input, host) = parse_graph(input)?;
    let (input, _) = opt(many1(line_ending))(input)?;
    let (input, k) = opt(terminated(
        preceded(space0, parse_usize),
        terminated(space0, opt(line_ending)),
    ))(input)?;
    Ok((
        input,
        Instance {
            pattern,
            host,
            k: k.unwrap_or(1),
        },
    ))
}

/// Parse an instance: n1, its matrix, n2, its matrix, then an optional k
/// (default 1). Negative entries never lex as integers and fail the parse.
pub fn parse_instance(input: &str) -> Result<Instance, InstanceError> {
    match instance_body(input) {
        Ok((rest, instance)) if rest.trim().is_empty() => Ok(instance),
        Ok((rest, _)) => Err(InstanceError::Malformed(format!(
            "unexpected trailing content: {:?}",
            rest.trim().chars().take(24).collect::<String>()
        ))),
        Err(e) => Err(InstanceError::Malformed(e.to_string())),
    }
}

/// Read and parse an instance file.
pub fn load_instance(path: &Path) -> Result<Instance, InstanceError> {
    let content = std::fs::read_to_string(path)?;
    parse_instance(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_two_graphs_and_k() {
        let input = "2\n0 1\n0 0\n\n3\n0 0 0\n0 0 0\n0 0 0\n2\n";
        let instance = parse_instance(input).unwrap();
        assert_eq!(instance.pattern.num_vertices(), 2);
        assert_eq!(instance.pattern.adj[0][1], 1);
        assert_eq!(instance.host.num_vertices(), 3);
        assert_eq!(instance.k, 2);
        assert!(instance.validate().is_ok());
    }

    #[test]
    fn test_k_defaults_to_one() {
        let input = "1\n0\n2\n0 0\n0 0\n";
        let instance = parse_instance(input).unwrap();
        assert_eq!(instance.k, 1);
    }

    #[test]
    fn test_handles_crlf_and_padding() {
        let input = "2\r\n 0 1\r\n 0 0\r\n\r\n2\r\n0 0\r\n0 0\r\n";
        let instance = parse_instance(input).unwrap();
        assert_eq!(instance.pattern.adj[0][1], 1);
        assert_eq!(instance.host.num_vertices(), 2);
    }

    #[test]
    fn test_rejects_short_rows() {
        let input = "2\n0 1\n0\n2\n0 0\n0 0\n";
        assert!(matches!(
            parse_instance(input),
            Err(InstanceError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_negative_entries() {
        let input = "2\n0 -1\n0 0\n2\n0 0\n0 0\n";
        assert!(matches!(
            parse_instance(input),
            Err(InstanceError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_trailing_garbage() {
        let input = "1\n0\n1\n0\n1\nextra\n";
        assert!(matches!(
            parse_instance(input),
            Err(InstanceError::Malformed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_small_host() {
        let input = "3\n0 0 0\n0 0 0\n0 0 0\n2\n0 0\n0 0\n";
        let instance = parse_instance(input).unwrap();
        assert!(matches!(
            instance.validate(),
            Err(InstanceError::Dimensions(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unreachable_k() {
        let input = "2\n0 0\n0 0\n2\n0 0\n0 0\n2\n";
        let instance = parse_instance(input).unwrap();
        assert!(matches!(
            instance.validate(),
            Err(InstanceError::Infeasible(_))
        ));
    }
}
