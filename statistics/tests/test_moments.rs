// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

use statistics::moment_table::MomentTable;
use statistics::moments::FourMoments;

#[test]
fn skewed_sample() {
    let m = FourMoments::new(&[1.0,2.0,3.0,10.0]).unwrap();
    assert_eq!(m.n,4);
    assert_eq!(m.mean,4.0);
    assert_eq!(m.variance,12.5);
    assert!((m.skewness.unwrap()-1.018234).abs()<1e-5);
    assert!((m.excess_kurtosis.unwrap()+0.7696).abs()<1e-9);
}

#[test]
fn single_value_has_no_shape() {
    let m = FourMoments::new(&[0.75]).unwrap();
    assert_eq!(m.mean,0.75);
    assert_eq!(m.variance,0.0);
    assert_eq!(m.std_dev(),0.0);
    assert!(m.skewness.is_none() && m.excess_kurtosis.is_none());
}

#[test]
fn repeated_rational_has_no_shape() {
    for value in [0.7,0.1,1.0/3.0] {
        let m = FourMoments::new(&[value;7]).unwrap();
        assert_eq!(m.n,7);
        assert_eq!(m.variance,0.0);
        assert_eq!(m.skewness,None);
        assert_eq!(m.excess_kurtosis,None);
    }
}

#[test]
fn table_round_trips_through_csv() -> anyhow::Result<()> {
    let mut table = MomentTable::new(vec!["n_issues".to_string(),"rule".to_string()]);
    assert!(table.add(vec!["3".to_string(),"borda".to_string()],&[1.0,2.0/3.0,1.0])?);
    assert!(table.add(vec!["5".to_string(),"rav".to_string()],&[0.6,0.6])?);
    assert!(!table.add(vec!["7".to_string(),"rav".to_string()],&[])?);
    assert!(table.add(vec!["only one".to_string()],&[1.0]).is_err());
    let mut buffer = vec![];
    table.write_csv(&mut buffer)?;
    let text = String::from_utf8(buffer.clone())?;
    assert!(text.starts_with("n_issues,rule,n,mean,variance,skewness,excess_kurtosis\n"));
    assert!(text.contains("5,rav,2,0.6,0,,\n"));
    let read = MomentTable::read_csv(buffer.as_slice())?;
    assert_eq!(read,table);
    Ok(())
}

#[test]
fn bad_headers_are_rejected() {
    assert!(MomentTable::read_csv("a,b\n1,2\n".as_bytes()).is_err());
    assert!(MomentTable::read_csv("rule,n,mean,variance,skew,excess_kurtosis\n".as_bytes()).is_err());
}
