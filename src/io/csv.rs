use std::io::{self, Write};
use std::path::Path;

use crate::sim::Trajectory;

/// Write one trajectory in CSV format.
///
/// Columns: t, x, y, z. Non-finite values are written as `NaN` / `inf`.
pub fn write_trajectory<W: Write>(writer: &mut W, traj: &Trajectory) -> io::Result<()> {
    writeln!(writer, "t,x,y,z")?;
    for (t, s) in traj.times.iter().zip(&traj.states) {
        writeln!(writer, "{:.6},{:.9},{:.9},{:.9}", t, s.x, s.y, s.z)?;
    }
    Ok(())
}

/// Write one trajectory to a CSV file at the given path.
pub fn write_trajectory_file(path: impl AsRef<Path>, traj: &Trajectory) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trajectory(&mut file, traj)?;
    file.flush()
}
