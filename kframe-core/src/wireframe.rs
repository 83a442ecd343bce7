/// Parser for wireframe meshes written as a small subset of Wavefront OBJ
///
/// Supported statements are `v x y z` vertices and `f i j k ...` faces with
/// 1-based indices. `#` starts a comment; normals, texture coordinates and
/// grouping statements are skipped.
use log::debug;
use nalgebra::Vector3;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, map_res, opt, rest, value},
    multi::many1,
    number::complete::double,
    sequence::{pair, preceded, terminated},
    IResult,
};

use crate::error::{Error, Result};
use crate::geometry::{Face, Wireframe};

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Vertex(Vector3<f64>),
    Face(Vec<usize>),
    Skip,
}

/// Parse wireframe text into a validated [`Wireframe`]
pub fn parse_wireframe(input: &str) -> Result<Wireframe> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for (number, text) in input.lines().enumerate() {
        let statement = match all_consuming(parse_line)(text) {
            Ok((_, statement)) => statement,
            Err(e) => {
                return Err(Error::ParseError(format!(
                    "line {}: {:?}",
                    number + 1,
                    e
                )))
            }
        };

        match statement {
            Statement::Vertex(vertex) => vertices.push(vertex),
            Statement::Face(indices) => {
                let indices = indices
                    .into_iter()
                    .map(|i| {
                        i.checked_sub(1).ok_or_else(|| {
                            Error::ParseError(format!("line {}: face index 0", number + 1))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                faces.push(Face::new(indices));
            }
            Statement::Skip => {}
        }
    }

    debug!(
        "parsed wireframe with {} vertices and {} faces",
        vertices.len(),
        faces.len()
    );
    Wireframe::new(vertices, faces)
}

fn parse_line(input: &str) -> IResult<&str, Statement> {
    let (input, _) = space0(input)?;
    let (input, statement) = alt((parse_ignored, parse_vertex, parse_face, parse_blank))(input)?;
    let (input, _) = space0(input)?;
    let (input, _) = opt(preceded(char('#'), rest))(input)?;
    Ok((input, statement))
}

fn parse_ignored(input: &str) -> IResult<&str, Statement> {
    let keyword = alt((
        tag("vn"),
        tag("vt"),
        tag("vp"),
        tag("usemtl"),
        tag("mtllib"),
        tag("o"),
        tag("g"),
        tag("s"),
        tag("l"),
    ));
    // Names and arguments are optional: a bare `g` or `s` line is valid
    value(
        Statement::Skip,
        pair(keyword, opt(preceded(space1, opt(is_not("#"))))),
    )(input)
}

fn parse_vertex(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag("v")(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    // Optional homogeneous weight
    let (input, _) = opt(preceded(space1, double))(input)?;
    Ok((input, Statement::Vertex(Vector3::new(x, y, z))))
}

fn parse_face(input: &str) -> IResult<&str, Statement> {
    let (input, _) = tag("f")(input)?;
    let (input, indices) = many1(preceded(space1, parse_index))(input)?;
    Ok((input, Statement::Face(indices)))
}

/// A vertex index, dropping any `/texture/normal` references after it
fn parse_index(input: &str) -> IResult<&str, usize> {
    terminated(
        map_res(digit1, str::parse::<usize>),
        opt(preceded(char('/'), is_not(" \t#"))),
    )(input)
}

fn parse_blank(input: &str) -> IResult<&str, Statement> {
    Ok((input, Statement::Skip))
}

fn parse_vector3(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, _) = space1(input)?;
    let (input, x) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = space1(input)?;
    let (input, z) = double(input)?;
    Ok((input, (x, y, z)))
}
